use crate::error::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Where the search-history log is persisted.
#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: default_history_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Zone used for time-of-day bucketing and history timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_article_count")]
    pub default_article_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            default_article_count: default_article_count(),
        }
    }
}

impl AnalysisConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            Error::config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            ))
        })
    }
}

// Defaults
fn default_history_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PULSE_HOME") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".article-pulse")
}
fn default_utc_offset_hours() -> i32 {
    8
}
fn default_article_count() -> usize {
    5
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if !(-12..=14).contains(&self.analysis.utc_offset_hours) {
            return Err(Error::config(format!(
                "analysis.utc_offset_hours must be within -12..=14, got {}",
                self.analysis.utc_offset_hours
            )));
        }
        if self.analysis.default_article_count == 0 {
            return Err(Error::config(
                "analysis.default_article_count must be at least 1",
            ));
        }
        if self.history.dir.as_os_str().is_empty() {
            return Err(Error::config("history.dir must not be empty"));
        }
        Ok(())
    }
}
