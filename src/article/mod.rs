// Article records as they arrive from the search API, and their canonical form.

mod normalize;

pub use normalize::{loose_count, loose_text, normalize, normalize_all};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_TITLE: &str = "未知标题";
pub const UNKNOWN_PUBLISHER: &str = "未知公众号";

/// One article exactly as the upstream search API returned it.
///
/// Every field is kept as a raw JSON value: counts show up as numbers on some
/// pages and as strings on others, and any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticleRecord {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub wx_name: Value,
    #[serde(default)]
    pub read: Value,
    #[serde(default)]
    pub praise: Value,
    #[serde(default)]
    pub looking: Value,
    #[serde(default)]
    pub publish_time: Value,
    #[serde(default)]
    pub publish_time_str: Value,
    #[serde(default)]
    pub is_original: Value,
    #[serde(default)]
    pub classify: Value,
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub short_link: Value,
    #[serde(default)]
    pub avatar: Value,
}

/// Canonical, fully typed article. Nothing downstream of the normalizer sees
/// a [`RawArticleRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub title: String,
    pub content: String,
    pub publisher: String,
    pub reads: u64,
    pub likes: u64,
    pub reviews: u64,
    /// Epoch seconds; 0 when unknown.
    pub publish_timestamp: u64,
    pub publish_time_str: String,
    pub is_original: bool,
    pub classify: String,
    pub url: String,
    pub short_link: String,
    pub avatar: String,
    /// `(likes + reviews) / reads * 100` with two decimals, or `"0"` when
    /// there are no reads.
    pub engagement_rate: String,
}

impl NormalizedArticle {
    /// Engagement rate as a number, if the stored string parses.
    pub fn engagement_value(&self) -> Option<f64> {
        self.engagement_rate
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// A batch of raw records plus the total hit count reported by the API.
#[derive(Debug, Clone)]
pub struct ArticleBatch {
    pub records: Vec<RawArticleRecord>,
    pub total_found: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Bare(Vec<RawArticleRecord>),
    Envelope {
        #[serde(default)]
        data: Vec<RawArticleRecord>,
        #[serde(default)]
        total: Value,
    },
}

impl ArticleBatch {
    /// Parse a batch file: either a bare JSON array of records or the search
    /// API envelope `{ "data": [...], "total": N }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: BatchFile = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("invalid article batch: {e}")))?;
        Ok(match file {
            BatchFile::Bare(records) => Self {
                total_found: records.len() as u64,
                records,
            },
            BatchFile::Envelope { data, total } => {
                let total_found = match loose_count(&total) {
                    0 => data.len() as u64,
                    n => n,
                };
                Self {
                    records: data,
                    total_found,
                }
            }
        })
    }

    /// Normalize at most `count` records from the front of the batch.
    pub fn normalized(&self, count: usize) -> Vec<NormalizedArticle> {
        normalize_all(self.records.iter().take(count))
    }
}
