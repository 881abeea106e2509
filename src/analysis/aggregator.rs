use super::types::Stats;
use crate::article::NormalizedArticle;

/// Mean reads over the batch, unrounded. `None` for an empty batch.
pub(crate) fn mean_reads(articles: &[NormalizedArticle]) -> Option<f64> {
    mean(articles.iter().map(|a| a.reads as f64))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| v.is_finite() && *v >= 0.0)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn aggregate(articles: &[NormalizedArticle]) -> Stats {
    if articles.is_empty() {
        return Stats::empty();
    }

    let avg_reads = mean_reads(articles).map_or(0, |m| m.round() as u64);
    let avg_likes = mean(articles.iter().map(|a| a.likes as f64)).map_or(0, |m| m.round() as u64);

    let engagements: Vec<f64> = articles
        .iter()
        .filter_map(NormalizedArticle::engagement_value)
        .collect();
    let avg_engagement = if engagements.is_empty() {
        "0%".to_string()
    } else {
        let m = engagements.iter().sum::<f64>() / engagements.len() as f64;
        format!("{m:.1}%")
    };

    Stats {
        total_articles: articles.len(),
        avg_reads,
        avg_likes,
        avg_engagement,
    }
}
