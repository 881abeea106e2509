// End-to-end run: raw batch → normalize → analyse → history summary.

use crate::analysis::{self, AnalysisResult};
use crate::article::ArticleBatch;
use crate::history::{HistoryStore, KvStore};
use chrono::FixedOffset;
use tracing::info;

/// What the caller asked for: the search keyword and how many of the fetched
/// records to analyse.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub keyword: String,
    pub article_count: usize,
}

/// Analyse the first `request.article_count` records of `batch` and, when a
/// history store is given, record a summary of the run.
pub fn run_analysis<S: KvStore>(
    batch: &ArticleBatch,
    request: &AnalysisRequest,
    offset: FixedOffset,
    history: Option<&mut HistoryStore<S>>,
) -> AnalysisResult {
    info!(
        keyword = %request.keyword,
        requested = request.article_count,
        available = batch.records.len(),
        total_found = batch.total_found,
        "analysis run starting"
    );

    let articles = batch.normalized(request.article_count);
    let result = analysis::analyze(&articles, offset);

    if let Some(history) = history {
        history.save(
            &result,
            &request.keyword,
            request.article_count,
            batch.total_found,
        );
    }

    result
}
