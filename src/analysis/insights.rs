use super::aggregator::mean_reads;
use super::types::{Insight, Stats};
use crate::article::NormalizedArticle;
use chrono::{DateTime, FixedOffset, Timelike};
use std::collections::HashSet;
use tracing::debug;

/// Batch measurements every rule reads from.
#[derive(Debug)]
struct Measurements {
    total: usize,
    high_read: usize,
    high_engagement: usize,
    publishers: usize,
    originals: usize,
    avg_title_len: f64,
    morning: usize,
    evening: usize,
}

impl Measurements {
    fn collect(articles: &[NormalizedArticle], stats: &Stats, offset: FixedOffset) -> Self {
        let read_threshold = mean_reads(articles).unwrap_or(0.0) * 2.0;
        let high_read = articles
            .iter()
            .filter(|a| a.reads as f64 > read_threshold)
            .count();
        let high_engagement = articles
            .iter()
            .filter(|a| a.engagement_value().is_some_and(|e| e > 3.0))
            .count();
        let publishers = articles
            .iter()
            .map(|a| a.publisher.as_str())
            .filter(|p| !p.is_empty())
            .collect::<HashSet<_>>()
            .len();
        let originals = articles.iter().filter(|a| a.is_original).count();

        let title_lens: Vec<usize> = articles
            .iter()
            .map(|a| a.title.chars().count())
            .filter(|&l| l > 0)
            .collect();
        let avg_title_len = if title_lens.is_empty() {
            0.0
        } else {
            title_lens.iter().sum::<usize>() as f64 / title_lens.len() as f64
        };

        let mut morning = 0;
        let mut evening = 0;
        for hour in articles
            .iter()
            .filter_map(|a| publish_hour(a.publish_timestamp, offset))
        {
            match hour {
                6..=11 => morning += 1,
                18..=23 => evening += 1,
                _ => {}
            }
        }

        Self {
            total: stats.total_articles,
            high_read,
            high_engagement,
            publishers,
            originals,
            avg_title_len,
            morning,
            evening,
        }
    }

    fn share(&self, n: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            n as f64 / self.total as f64 * 100.0
        }
    }
}

fn publish_hour(timestamp: u64, offset: FixedOffset) -> Option<u32> {
    let secs = i64::try_from(timestamp).ok()?;
    DateTime::from_timestamp(secs, 0).map(|t| t.with_timezone(&offset).hour())
}

/// A predicate over the batch and the insight it yields when it holds.
struct Rule {
    name: &'static str,
    fires: fn(&Measurements) -> bool,
    insight: fn(&Measurements) -> Insight,
}

/// Evaluated in order, every rule, every time. Order is display order.
static RULES: &[Rule] = &[
    Rule {
        name: "high-read-ratio",
        fires: |m| m.high_read > 0,
        insight: |m| {
            Insight::new(
                format!("{:.1}% 的文章表现突出", m.share(m.high_read)),
                format!(
                    "有 {} 篇文章阅读量超过平均值的2倍，说明该话题存在爆款潜力。重点关注这些高表现文章的标题和内容特点。",
                    m.high_read
                ),
                (50 + m.high_read as i64 * 10).min(95),
            )
        },
    },
    Rule {
        name: "high-engagement",
        fires: |m| m.high_engagement > 0,
        insight: |m| {
            Insight::new(
                format!("用户参与度较高，{} 篇文章互动率超3%", m.high_engagement),
                "该话题内容能引发用户强烈共鸣，建议创作更多引导互动的内容形式，如提问式标题、争议性观点等。",
                (55 + m.high_engagement as i64 * 6).min(90),
            )
        },
    },
    Rule {
        name: "publisher-diversity",
        fires: |m| m.publishers > 5,
        insight: |m| {
            Insight::new(
                format!("多元化内容生态，{} 个公众号参与讨论", m.publishers),
                "该话题受到广泛关注，涉及多个领域的创作者。建议结合不同角度创作内容，避免同质化竞争。",
                80,
            )
        },
    },
    Rule {
        name: "originality",
        fires: |m| m.originals as f64 > m.total as f64 * 0.5,
        insight: |m| {
            Insight::new(
                format!("原创内容占主导，比例达 {:.1}%", m.share(m.originals)),
                "该话题创作者更倾向于分享原创观点和深度分析，说明有足够的原创空间，适合产出差异化内容。",
                85,
            )
        },
    },
    Rule {
        name: "title-length",
        fires: |m| m.avg_title_len > 20.0,
        insight: |m| {
            Insight::new(
                format!("标题偏向详细描述，平均长度 {:.1} 个字", m.avg_title_len),
                "该话题适合使用信息量丰富的标题，建议在标题中包含具体数字、方法或结果，提高点击率。",
                75,
            )
        },
    },
    Rule {
        name: "evening-skew",
        fires: |m| m.evening as f64 > m.morning as f64 * 1.5,
        insight: |m| {
            Insight::new(
                format!("晚间发布效果更佳，{} 篇集中在18:00后", m.evening),
                "用户在该时间段对相关内容关注度更高，建议安排在晚间发布，可获得更好的曝光效果。",
                80,
            )
        },
    },
];

const FALLBACK_CONFIDENCE: i64 = 70;

fn fallback(m: &Measurements) -> Insight {
    Insight::new(
        format!("发现 {} 篇相关内容，话题热度稳定", m.total),
        "该话题有持续的内容产出，建议分析热门文章的共同点，找到适合的创作角度和表达方式。",
        FALLBACK_CONFIDENCE,
    )
}

/// Run the rule battery. Non-empty for any non-empty batch; empty otherwise.
pub fn generate(
    articles: &[NormalizedArticle],
    stats: &Stats,
    offset: FixedOffset,
) -> Vec<Insight> {
    if articles.is_empty() {
        return Vec::new();
    }

    let m = Measurements::collect(articles, stats, offset);
    debug!(?m, "insight measurements");

    let mut insights: Vec<Insight> = RULES
        .iter()
        .filter(|rule| (rule.fires)(&m))
        .inspect(|rule| debug!(rule = rule.name, "insight rule fired"))
        .map(|rule| (rule.insight)(&m))
        .collect();

    if insights.is_empty() {
        insights.push(fallback(&m));
    }
    insights
}
