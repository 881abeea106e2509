// Analysis pipeline: normalized batch → stats, leaderboards, keyword cloud → insights.

pub mod aggregator;
pub mod insights;
pub mod keywords;
pub mod ranker;
pub mod types;

pub use types::{AnalysisResult, Insight, RankedArticle, Stats, WordCloudEntry};

use crate::article::NormalizedArticle;
use chrono::FixedOffset;
use tracing::info;

/// Analyse a normalized batch.
///
/// Aggregation, ranking and keyword extraction are independent of each other;
/// the insight battery reads the batch plus the aggregated stats. An empty
/// batch short-circuits to all-zero stats and empty lists.
pub fn analyze(articles: &[NormalizedArticle], offset: FixedOffset) -> AnalysisResult {
    if articles.is_empty() {
        info!("no articles to analyse, returning empty result");
        return AnalysisResult::default();
    }

    let stats = aggregator::aggregate(articles);
    let top_by_likes = ranker::top_by_likes(articles);
    let top_by_engagement = ranker::top_by_engagement(articles);
    let word_cloud = keywords::word_cloud(articles);
    let insights = insights::generate(articles, &stats, offset);

    info!(
        articles = stats.total_articles,
        avg_reads = stats.avg_reads,
        avg_engagement = %stats.avg_engagement,
        insights = insights.len(),
        keywords = word_cloud.len(),
        "analysis complete"
    );

    AnalysisResult {
        stats,
        top_by_likes,
        top_by_engagement,
        insights,
        word_cloud,
    }
}
