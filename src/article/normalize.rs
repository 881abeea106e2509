use super::{NormalizedArticle, RawArticleRecord, UNKNOWN_PUBLISHER, UNKNOWN_TITLE};
use serde_json::Value;
use tracing::debug;

/// Read a count that may arrive as a number or as numeric-looking text.
///
/// Strings are read like an integer prefix (`"15abc"` is 15). Fractions
/// truncate. Negative, non-numeric and non-scalar values are 0.
pub fn loose_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
            _ => 0,
        }),
        Value::String(s) => integer_prefix(s),
        _ => 0,
    }
}

fn integer_prefix(s: &str) -> u64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if negative || digits_end == 0 {
        return 0;
    }
    rest[..digits_end]
        .bytes()
        .try_fold(0u64, |n, d| n.checked_mul(10)?.checked_add(u64::from(d - b'0')))
        .unwrap_or(u64::MAX)
}

/// Read a text field. Numbers are rendered in decimal; anything else is empty.
pub fn loose_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn loose_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

fn non_empty_or(text: String, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

/// `(likes + reviews) / reads * 100` to two decimals, `"0"` without reads.
pub(crate) fn engagement_rate(reads: u64, likes: u64, reviews: u64) -> String {
    if reads == 0 {
        return "0".into();
    }
    let rate = (likes as f64 + reviews as f64) / reads as f64 * 100.0;
    format!("{rate:.2}")
}

/// Coerce one raw record into its canonical form. Never fails.
pub fn normalize(raw: &RawArticleRecord) -> NormalizedArticle {
    let reads = loose_count(&raw.read);
    let likes = loose_count(&raw.praise);
    let reviews = loose_count(&raw.looking);

    NormalizedArticle {
        title: non_empty_or(loose_text(&raw.title), UNKNOWN_TITLE),
        content: loose_text(&raw.content),
        publisher: non_empty_or(loose_text(&raw.wx_name), UNKNOWN_PUBLISHER),
        reads,
        likes,
        reviews,
        publish_timestamp: loose_count(&raw.publish_time),
        publish_time_str: loose_text(&raw.publish_time_str),
        is_original: loose_flag(&raw.is_original),
        classify: loose_text(&raw.classify),
        url: loose_text(&raw.url),
        short_link: loose_text(&raw.short_link),
        avatar: loose_text(&raw.avatar),
        engagement_rate: engagement_rate(reads, likes, reviews),
    }
}

pub fn normalize_all<'a>(
    records: impl IntoIterator<Item = &'a RawArticleRecord>,
) -> Vec<NormalizedArticle> {
    let articles: Vec<NormalizedArticle> = records.into_iter().map(normalize).collect();
    debug!(count = articles.len(), "normalized article records");
    articles
}
