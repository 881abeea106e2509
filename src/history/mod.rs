// Capped, newest-first log of past analysis runs.

mod store;

pub use store::{FileStore, KvStore, MemoryStore};

use crate::analysis::{AnalysisResult, Insight, RankedArticle, Stats};
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const HISTORY_KEY: &str = "search_history";
pub const HISTORY_CAP: usize = 50;

/// Summary of one analysis run. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    /// Epoch milliseconds of the run, as text; unique within a log.
    pub id: String,
    pub keyword: String,
    pub article_count: usize,
    pub total_found: u64,
    /// Epoch milliseconds of the wall clock at save time. May trail `id` when
    /// the id was bumped to stay unique.
    pub search_time: i64,
    pub search_time_str: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, rename = "topLikesArticles")]
    pub top_by_likes: Vec<RankedArticle>,
    #[serde(default, rename = "topEngagementArticles")]
    pub top_by_engagement: Vec<RankedArticle>,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

/// History log over a key-value backend.
///
/// None of the public operations fail: unreadable logs read as empty and
/// failed writes are logged and dropped.
pub struct HistoryStore<S: KvStore> {
    backend: S,
    offset: FixedOffset,
}

impl<S: KvStore> HistoryStore<S> {
    /// `offset` is the zone `searchTimeStr` is rendered in.
    pub fn new(backend: S, offset: FixedOffset) -> Self {
        Self { backend, offset }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn read(&self) -> Result<Vec<SearchHistoryEntry>> {
        match self.backend.get(HISTORY_KEY)? {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| Error::parse(format!("corrupt search history: {e}"))),
        }
    }

    fn write(&mut self, entries: &[SearchHistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| Error::parse(format!("serialize search history: {e}")))?;
        self.backend.set(HISTORY_KEY, &json)
    }

    /// All entries, newest first. Empty when absent or unreadable.
    pub fn list(&self) -> Vec<SearchHistoryEntry> {
        self.read().unwrap_or_else(|e| {
            warn!(error = %e, "failed to read search history, treating as empty");
            Vec::new()
        })
    }

    pub fn get(&self, id: &str) -> Option<SearchHistoryEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Record a run as of now. See [`HistoryStore::save_at`].
    pub fn save(
        &mut self,
        result: &AnalysisResult,
        keyword: &str,
        article_count: usize,
        total_found: u64,
    ) -> SearchHistoryEntry {
        self.save_at(result, keyword, article_count, total_found, Utc::now())
    }

    /// Prepend a summary of `result` and truncate the log to [`HISTORY_CAP`].
    ///
    /// The id is `now` in epoch milliseconds, bumped past the newest existing
    /// id when the clock has not moved on. `search_time` always records `now`.
    pub fn save_at(
        &mut self,
        result: &AnalysisResult,
        keyword: &str,
        article_count: usize,
        total_found: u64,
        now: DateTime<Utc>,
    ) -> SearchHistoryEntry {
        let existing = self.list();

        let mut millis = now.timestamp_millis();
        if let Some(newest) = existing.first().and_then(|e| e.id.parse::<i64>().ok()) {
            millis = millis.max(newest.saturating_add(1));
        }

        let entry = SearchHistoryEntry {
            id: millis.to_string(),
            keyword: keyword.to_string(),
            article_count,
            total_found,
            search_time: now.timestamp_millis(),
            search_time_str: now
                .with_timezone(&self.offset)
                .format("%Y/%-m/%-d %H:%M:%S")
                .to_string(),
            stats: result.stats.clone(),
            top_by_likes: result.top_by_likes.clone(),
            top_by_engagement: result.top_by_engagement.clone(),
            insights: result.insights.clone(),
        };

        let entries: Vec<SearchHistoryEntry> = std::iter::once(entry.clone())
            .chain(existing)
            .take(HISTORY_CAP)
            .collect();

        match self.write(&entries) {
            Ok(()) => info!(id = %entry.id, keyword, retained = entries.len(), "saved search history"),
            Err(e) => warn!(error = %e, keyword, "failed to save search history"),
        }
        entry
    }

    /// Remove the entry with `id`. Returns whether one was removed.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!(id, "no search history entry to delete");
            return false;
        }
        if let Err(e) = self.write(&entries) {
            warn!(error = %e, id, "failed to delete search history entry");
            return false;
        }
        info!(id, "deleted search history entry");
        true
    }

    pub fn clear(&mut self) {
        match self.backend.remove(HISTORY_KEY) {
            Ok(()) => info!("cleared search history"),
            Err(e) => warn!(error = %e, "failed to clear search history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn store() -> HistoryStore<MemoryStore> {
        HistoryStore::new(MemoryStore::new(), cst())
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn entry_uses_original_storage_keys() {
        let mut history = store();
        history.save_at(&AnalysisResult::default(), "营销", 5, 120, at(1_731_312_000));
        let json = history.backend().get(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        for key in [
            "id",
            "keyword",
            "articleCount",
            "totalFound",
            "searchTime",
            "searchTimeStr",
            "stats",
            "topLikesArticles",
            "topEngagementArticles",
            "insights",
        ] {
            assert!(first.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(first["stats"]["avgEngagement"], "0%");
    }

    #[test]
    fn timestamp_string_uses_configured_offset() {
        let mut history = store();
        // 2024-11-11 08:00:00 UTC
        let entry = history.save_at(&AnalysisResult::default(), "k", 1, 1, at(1_731_312_000));
        assert_eq!(entry.search_time_str, "2024/11/11 16:00:00");
        assert_eq!(entry.id, "1731312000000");
        assert_eq!(entry.search_time, 1_731_312_000_000);
    }

    #[test]
    fn ids_stay_unique_when_clock_stalls() {
        let mut history = store();
        let now = at(1_731_312_000);
        let a = history.save_at(&AnalysisResult::default(), "a", 1, 1, now);
        let b = history.save_at(&AnalysisResult::default(), "b", 1, 1, now);
        assert_ne!(a.id, b.id);
        assert!(b.id.parse::<i64>().unwrap() > a.id.parse::<i64>().unwrap());
    }

    #[test]
    fn bumped_id_keeps_wall_clock_search_time() {
        let mut history = store();
        let now = at(1_731_312_000);
        history.save_at(&AnalysisResult::default(), "a", 1, 1, now);
        let b = history.save_at(&AnalysisResult::default(), "b", 1, 1, now);
        assert_eq!(b.id, "1731312000001");
        assert_eq!(b.search_time, 1_731_312_000_000);
    }

    #[test]
    fn maximal_stored_id_does_not_overflow_next_save() {
        let mut history = store();
        let seeded = format!(
            r#"[{{"id":"{}","keyword":"old","articleCount":1,"totalFound":1,
                "searchTime":1,"searchTimeStr":"2024/11/11 20:00:00"}}]"#,
            i64::MAX
        );
        history.backend_mut().set(HISTORY_KEY, &seeded).unwrap();

        let entry = history.save_at(&AnalysisResult::default(), "new", 1, 1, at(1_731_312_000));
        assert_eq!(entry.id, i64::MAX.to_string());
        let entries = history.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].keyword, "new");
    }

    #[test]
    fn corrupt_log_reads_empty_and_is_overwritten_on_save() {
        let mut history = store();
        history.backend_mut().set(HISTORY_KEY, "{not json").unwrap();
        assert!(history.list().is_empty());

        history.save_at(&AnalysisResult::default(), "k", 1, 1, at(1_731_312_000));
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn reads_legacy_entries_without_optional_sections() {
        let mut history = store();
        let legacy = r#"[{"id":"1","keyword":"AI创作","articleCount":10,"totalFound":300,
            "searchTime":1,"searchTimeStr":"2024/11/11 20:00:00"}]"#;
        history.backend_mut().set(HISTORY_KEY, legacy).unwrap();
        let entries = history.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stats, Stats::empty());
        assert!(entries[0].insights.is_empty());
    }
}
