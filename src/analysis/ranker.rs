use super::types::RankedArticle;
use crate::article::NormalizedArticle;
use std::cmp::Ordering;

pub const TOP_N: usize = 5;

/// Sort key extractor. `None` excludes the article from the ranking.
type RankKey = fn(&NormalizedArticle) -> Option<f64>;

fn likes_key(a: &NormalizedArticle) -> Option<f64> {
    Some(a.likes as f64)
}

fn engagement_key(a: &NormalizedArticle) -> Option<f64> {
    a.engagement_value()
}

/// Rank eligible articles by `key`, highest first, keeping batch order among
/// ties. Articles without a title or a usable key are dropped rather than
/// scored as zero.
fn top_by(articles: &[NormalizedArticle], key: RankKey) -> Vec<RankedArticle> {
    let mut eligible: Vec<(f64, &NormalizedArticle)> = articles
        .iter()
        .filter(|a| !a.title.is_empty())
        .filter_map(|a| key(a).map(|k| (k, a)))
        .collect();

    // sort_by is stable
    eligible.sort_by(|(ka, _), (kb, _)| kb.partial_cmp(ka).unwrap_or(Ordering::Equal));

    eligible
        .into_iter()
        .take(TOP_N)
        .map(|(_, a)| RankedArticle {
            title: a.title.clone(),
            likes: a.likes,
            reads: a.reads,
            engagement: a.engagement_rate.clone(),
        })
        .collect()
}

pub fn top_by_likes(articles: &[NormalizedArticle]) -> Vec<RankedArticle> {
    top_by(articles, likes_key)
}

pub fn top_by_engagement(articles: &[NormalizedArticle]) -> Vec<RankedArticle> {
    top_by(articles, engagement_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{RawArticleRecord, normalize};
    use serde_json::json;

    fn article(title: &str, reads: u64, likes: u64) -> NormalizedArticle {
        let raw: RawArticleRecord = serde_json::from_value(json!({
            "title": title,
            "read": reads,
            "praise": likes,
        }))
        .unwrap();
        normalize(&raw)
    }

    fn titles(ranked: &[RankedArticle]) -> Vec<&str> {
        ranked.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn likes_ranking_is_descending_and_capped() {
        let articles: Vec<_> = (0..8)
            .map(|i| article(&format!("a{i}"), 1000, i * 10))
            .collect();
        let top = top_by_likes(&articles);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(titles(&top), vec!["a7", "a6", "a5", "a4", "a3"]);
    }

    #[test]
    fn ties_keep_batch_order() {
        let articles = vec![
            article("first", 100, 5),
            article("second", 100, 9),
            article("third", 100, 5),
            article("fourth", 100, 5),
        ];
        assert_eq!(
            titles(&top_by_likes(&articles)),
            vec!["second", "first", "third", "fourth"]
        );
    }

    #[test]
    fn engagement_ranking_uses_parsed_rate() {
        let articles = vec![
            article("low", 1000, 5),    // 0.50
            article("high", 100, 12),   // 12.00
            article("none", 0, 50),     // 0
            article("mid", 200, 8),     // 4.00
        ];
        let top = top_by_engagement(&articles);
        assert_eq!(titles(&top), vec!["high", "mid", "low", "none"]);
        assert_eq!(top[0].engagement, "12.00");
        assert_eq!(top[0].likes, 12);
        assert_eq!(top[0].reads, 100);
    }

    #[test]
    fn unparseable_engagement_is_excluded_not_zeroed() {
        let mut broken = article("broken", 100, 50);
        broken.engagement_rate = "?".into();
        let articles = vec![broken, article("ok", 100, 1)];
        assert_eq!(titles(&top_by_engagement(&articles)), vec!["ok"]);
        assert_eq!(top_by_likes(&articles).len(), 2);
    }

    #[test]
    fn untitled_articles_are_excluded() {
        let mut untitled = article("x", 100, 99);
        untitled.title.clear();
        let articles = vec![untitled, article("kept", 100, 1)];
        assert_eq!(titles(&top_by_likes(&articles)), vec!["kept"]);
    }

    #[test]
    fn empty_batch_ranks_nothing() {
        assert!(top_by_likes(&[]).is_empty());
        assert!(top_by_engagement(&[]).is_empty());
    }
}
