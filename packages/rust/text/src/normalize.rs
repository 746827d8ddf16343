//! Sentence normalization applied after segmentation.

use std::sync::LazyLock;

use regex::Regex;

/// Strip punctuation and collapse whitespace.
///
/// Removes every character that is neither a word character nor whitespace,
/// collapses whitespace runs to single spaces, and trims both ends. Applied
/// per sentence once boundaries are known, so queries and scoring never see
/// punctuation.
pub fn normalize(text: &str) -> String {
    static PUNCT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let stripped = PUNCT_RE.replace_all(text, "");
    WS_RE.replace_all(&stripped, " ").trim().to_string()
}
