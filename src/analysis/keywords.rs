use super::types::WordCloudEntry;
use crate::article::NormalizedArticle;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MAX_WORDS: usize = 20;
const MIN_SIZE: usize = 20;
const MAX_SIZE: usize = 48;

/// Maximal runs of CJK unified ideographs. No dictionary segmentation: a run
/// is one token.
static IDEOGRAPH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4E00}-\x{9FA5}]+").expect("valid ideograph pattern"));

/// Common function words dropped from the cloud.
static STOP_WORDS: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "为", "与",
    "之", "用", "等", "及", "来", "从", "后", "而", "前", "其", "他", "她", "它", "们",
];

fn is_keyword(token: &str) -> bool {
    token.chars().count() >= 2 && !STOP_WORDS.contains(&token)
}

/// Frequency-ranked keyword cloud over titles and bodies.
///
/// Equal counts keep first-seen order so repeated runs over the same batch
/// give identical output.
pub fn word_cloud(articles: &[NormalizedArticle]) -> Vec<WordCloudEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for article in articles {
        for token in [article.title.as_str(), article.content.as_str()]
            .into_iter()
            .flat_map(|text| IDEOGRAPH_RUN.find_iter(text))
            .map(|m| m.as_str())
            .filter(|t| is_keyword(t))
        {
            match index.get(token) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(token, counts.len());
                    counts.push((token, 1));
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(MAX_WORDS)
        .map(|(word, count)| WordCloudEntry {
            word: word.to_string(),
            count,
            size: (count * 2).clamp(MIN_SIZE, MAX_SIZE),
        })
        .collect()
}
