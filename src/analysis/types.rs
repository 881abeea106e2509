use serde::{Deserialize, Serialize};

/// Headline statistics over one analysed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_articles: usize,
    pub avg_reads: u64,
    pub avg_likes: u64,
    /// Mean engagement with one decimal and a trailing `%`, e.g. `"3.4%"`.
    pub avg_engagement: String,
}

impl Stats {
    pub fn empty() -> Self {
        Self {
            total_articles: 0,
            avg_reads: 0,
            avg_likes: 0,
            avg_engagement: "0%".into(),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Leaderboard projection of an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedArticle {
    pub title: String,
    pub likes: u64,
    pub reads: u64,
    pub engagement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    /// Score in `0..=100`; not a probability.
    pub confidence: u8,
}

impl Insight {
    pub fn new(title: impl Into<String>, description: impl Into<String>, confidence: i64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            confidence: confidence.clamp(0, 100) as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudEntry {
    pub word: String,
    pub count: usize,
    /// Display weight in `20..=48`.
    pub size: usize,
}

/// Everything one analysis call produces. Never persisted whole; the history
/// store keeps a summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub stats: Stats,
    pub top_by_likes: Vec<RankedArticle>,
    pub top_by_engagement: Vec<RankedArticle>,
    pub insights: Vec<Insight>,
    pub word_cloud: Vec<WordCloudEntry>,
}
