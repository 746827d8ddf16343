//! Core domain types for copyscan checks and reports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message carried by the trivial report when no sentence found a source.
pub const NO_PLAGIARISM_MESSAGE: &str = "No plagiarism detected!";

// ---------------------------------------------------------------------------
// CheckId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one plagiarism check (time-sortable).
///
/// Logged on the pipeline's start and end events so server logs can be
/// correlated per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(pub Uuid);

impl CheckId {
    /// Generate a new time-sortable check identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CheckId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CheckId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// SentenceUnit
// ---------------------------------------------------------------------------

/// One segmented sentence with its position in the source document.
///
/// Ordering is meaningful: `index` preserves document order and is the
/// correlation key for everything downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceUnit {
    /// Zero-based position in document order.
    pub index: usize,
    /// The sentence text.
    pub text: String,
}

// ---------------------------------------------------------------------------
// CandidateReference
// ---------------------------------------------------------------------------

/// A sentence's candidate source URL.
///
/// One per sentence, position-correlated: `sentence_index` lives in the same
/// index space as [`SentenceUnit::index`], and `url` is `None` when no
/// acceptable search result exists (not a filtered list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReference {
    /// Index of the sentence this candidate belongs to.
    pub sentence_index: usize,
    /// First acceptable search hit, if any.
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// MatchResult
// ---------------------------------------------------------------------------

/// A scored pairing of a sentence and the page it may have been copied from.
///
/// Created only when the sentence had a candidate URL and that page yielded
/// non-empty text; never created otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The sentence that was checked.
    pub sentence: String,
    /// The page the sentence was scored against.
    pub url: String,
    /// Bag-of-words cosine similarity in `[0, 1]`.
    pub similarity: f64,
}

// ---------------------------------------------------------------------------
// AggregateReport
// ---------------------------------------------------------------------------

/// The final per-request summary returned to the caller.
///
/// Constructed once by the pipeline's aggregation stage and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Human-readable indicator, set only on the trivial short-circuit
    /// report (every lookup came back empty-handed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Scored matches, ordered by sentence position.
    pub results: Vec<MatchResult>,
    /// Arithmetic mean of match similarities, `0.0` when nothing matched.
    ///
    /// Averages over *matched* sentences only, not all sentences; a document
    /// with one near-copy and many unmatched sentences reports the near-copy's
    /// score. Documented behavior, kept as-is.
    pub overall_similarity: f64,
    /// Number of sentences processed (after the cap was applied).
    pub total_sentences: usize,
    /// Number of sentences that produced a match; always `<= total_sentences`.
    pub matched_sentences: usize,
}

impl AggregateReport {
    /// Reduce a batch of matches into the final report.
    pub fn from_matches(results: Vec<MatchResult>, total_sentences: usize) -> Self {
        let matched_sentences = results.len();
        let overall_similarity = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|m| m.similarity).sum::<f64>() / results.len() as f64
        };

        Self {
            message: None,
            results,
            overall_similarity,
            total_sentences,
            matched_sentences,
        }
    }

    /// The trivial report produced when every lookup returned no URL.
    pub fn no_matches(total_sentences: usize) -> Self {
        Self {
            message: Some(NO_PLAGIARISM_MESSAGE.into()),
            results: Vec::new(),
            overall_similarity: 0.0,
            total_sentences,
            matched_sentences: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// FileComparison
// ---------------------------------------------------------------------------

/// Result of the whole-document comparison op (sequence-alignment ratio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileComparison {
    /// Ratcliff/Obershelp ratio in `[0, 1]`.
    pub similarity: f64,
    /// Name of the first file as supplied by the caller.
    pub file1_name: String,
    /// Name of the second file as supplied by the caller.
    pub file2_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_id_roundtrip() {
        let id = CheckId::new();
        let s = id.to_string();
        let parsed: CheckId = s.parse().expect("parse CheckId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn report_mean_over_matches_only() {
        let results = vec![
            MatchResult {
                sentence: "a".into(),
                url: "https://example.com/1".into(),
                similarity: 1.0,
            },
            MatchResult {
                sentence: "b".into(),
                url: "https://example.com/2".into(),
                similarity: 0.5,
            },
        ];
        let report = AggregateReport::from_matches(results, 10);
        assert_eq!(report.matched_sentences, 2);
        assert_eq!(report.total_sentences, 10);
        assert!((report.overall_similarity - 0.75).abs() < 1e-9);
        assert!(report.message.is_none());
    }

    #[test]
    fn report_empty_matches_is_zero() {
        let report = AggregateReport::from_matches(Vec::new(), 4);
        assert_eq!(report.overall_similarity, 0.0);
        assert_eq!(report.matched_sentences, 0);
        assert_eq!(report.total_sentences, 4);
    }

    #[test]
    fn trivial_report_carries_message() {
        let report = AggregateReport::no_matches(3);
        assert_eq!(report.message.as_deref(), Some(NO_PLAGIARISM_MESSAGE));
        assert_eq!(report.overall_similarity, 0.0);
        assert_eq!(report.total_sentences, 3);
        assert_eq!(report.matched_sentences, 0);
        assert!(report.results.is_empty());
    }

    #[test]
    fn report_wire_names() {
        let report = AggregateReport::from_matches(
            vec![MatchResult {
                sentence: "the quick brown fox".into(),
                url: "https://example.com/fox".into(),
                similarity: 0.9,
            }],
            1,
        );
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains(r#""results""#));
        assert!(json.contains(r#""overall_similarity""#));
        assert!(json.contains(r#""total_sentences""#));
        assert!(json.contains(r#""matched_sentences""#));
        assert!(json.contains(r#""sentence":"the quick brown fox""#));
        // message is omitted unless set
        assert!(!json.contains("message"));
    }

    #[test]
    fn trivial_report_serializes_message() {
        let json = serde_json::to_string(&AggregateReport::no_matches(2)).expect("serialize");
        assert!(json.contains(r#""message":"No plagiarism detected!""#));
    }

    #[test]
    fn file_comparison_wire_names() {
        let cmp = FileComparison {
            similarity: 1.0,
            file1_name: "a.txt".into(),
            file2_name: "b.txt".into(),
        };
        let json = serde_json::to_string(&cmp).expect("serialize");
        assert!(json.contains(r#""file1_name":"a.txt""#));
        assert!(json.contains(r#""file2_name":"b.txt""#));
    }
}
