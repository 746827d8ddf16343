//! Sentence segmentation.
//!
//! The primary strategy is a rule-based boundary model: a scan over sentence
//! terminators guarded by an abbreviation table, so "Dr. Smith" and "J. K."
//! initials do not split. If the model cannot be built the segmenter falls
//! back to a literal `.` split; construction never fails either way.

use std::collections::HashSet;

use tracing::warn;

use copyscan_shared::{CopyscanError, Result, SentenceUnit};

/// Abbreviations whose trailing period does not end a sentence.
/// One lowercase entry per line; embedded periods are kept ("u.s").
const ABBREVIATIONS: &str = "\
mr
mrs
ms
dr
prof
rev
hon
st
jr
sr
vs
etc
e.g
i.e
cf
al
inc
ltd
co
corp
no
vol
pp
approx
dept
est
fig
u.s
u.k
";

/// Splits document text into an ordered sequence of sentence units.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    strategy: Strategy,
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Terminator scan guarded by the abbreviation table.
    Model(BoundaryModel),
    /// Literal `.` split. Materially worse, but never wrong to fall back to.
    NaiveSplit,
}

impl SentenceSegmenter {
    /// Build a segmenter, falling back to the naive splitter if the boundary
    /// model is unavailable.
    pub fn new() -> Self {
        match BoundaryModel::load() {
            Ok(model) => Self {
                strategy: Strategy::Model(model),
            },
            Err(e) => {
                warn!(error = %e, "sentence boundary model unavailable, using naive split");
                Self {
                    strategy: Strategy::NaiveSplit,
                }
            }
        }
    }

    /// Split `text` into sentence units with zero-based document-order
    /// indexes. Empty or whitespace-only input yields an empty vec.
    pub fn segment(&self, text: &str) -> Vec<SentenceUnit> {
        let raw = match &self.strategy {
            Strategy::Model(model) => model.split(text),
            Strategy::NaiveSplit => text
                .split('.')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        raw.into_iter()
            .enumerate()
            .map(|(index, text)| SentenceUnit { index, text })
            .collect()
    }

    fn naive() -> Self {
        Self {
            strategy: Strategy::NaiveSplit,
        }
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Boundary model
// ---------------------------------------------------------------------------

/// Terminator-scan boundary model with an abbreviation guard.
#[derive(Debug, Clone)]
struct BoundaryModel {
    abbreviations: HashSet<String>,
}

impl BoundaryModel {
    /// Parse the embedded abbreviation table.
    fn load() -> Result<Self> {
        let abbreviations: HashSet<String> = ABBREVIATIONS
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();

        if abbreviations.is_empty() {
            return Err(CopyscanError::internal("abbreviation table is empty"));
        }

        Ok(Self { abbreviations })
    }

    /// Split on terminator runs (`.`, `!`, `?`), keeping the terminators
    /// attached to their sentence.
    fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            if !is_terminator(c) {
                i += 1;
                continue;
            }

            // Absorb the whole terminator run ("...", "?!").
            let mut j = i + 1;
            while j < chars.len() && is_terminator(chars[j].1) {
                j += 1;
            }
            let end = chars.get(j).map_or(text.len(), |&(p, _)| p);

            let is_boundary = match chars.get(j) {
                None => true,
                Some(&(_, next)) if next.is_whitespace() => {
                    // A lone period after an abbreviation or initial stays
                    // inside the sentence; runs like "..." always split.
                    !(j == i + 1 && c == '.' && self.ends_with_abbreviation(&text[start..pos]))
                }
                // Mid-token terminator ("3.14", "example.com"): keep scanning.
                Some(_) => false,
            };

            if is_boundary {
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                while j < chars.len() && chars[j].1.is_whitespace() {
                    j += 1;
                }
                start = chars.get(j).map_or(text.len(), |&(p, _)| p);
            }
            i = j;
        }

        if start < text.len() {
            let tail = text[start..].trim();
            if !tail.is_empty() {
                sentences.push(tail.to_string());
            }
        }

        sentences
    }

    /// True if the last token of `preceding` is an abbreviation or a
    /// single-letter initial.
    fn ends_with_abbreviation(&self, preceding: &str) -> bool {
        let Some(word) = preceding.split_whitespace().next_back() else {
            return false;
        };

        let mut initial = word.chars();
        if initial.next().is_some_and(char::is_uppercase) && initial.next().is_none() {
            return true;
        }

        self.abbreviations.contains(&word.to_lowercase())
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminators() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("First sentence. Second one! A third?");
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["First sentence.", "Second one!", "A third?"]
        );
    }

    #[test]
    fn indexes_follow_document_order() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("One. Two. Three.");
        assert_eq!(units.len(), 3);
        for (expected, unit) in units.iter().enumerate() {
            assert_eq!(unit.index, expected);
        }
    }

    #[test]
    fn abbreviations_do_not_split() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("Dr. Smith arrived late. Everyone waited.");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "Dr. Smith arrived late.");
    }

    #[test]
    fn single_letter_initials_do_not_split() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("J. K. Rowling wrote it. The end.");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "J. K. Rowling wrote it.");
    }

    #[test]
    fn decimals_do_not_split() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("Pi is roughly 3.14 in value. Next sentence.");
        assert_eq!(units.len(), 2);
        assert!(units[0].text.contains("3.14"));
    }

    #[test]
    fn ellipsis_ends_a_sentence() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("It trailed off... Then it resumed.");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, "It trailed off...");
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        let segmenter = SentenceSegmenter::new();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("   ").is_empty());
    }

    #[test]
    fn text_without_terminators_is_one_sentence() {
        let segmenter = SentenceSegmenter::new();
        let units = segmenter.segment("hello world this is one unit");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, 0);
    }

    #[test]
    fn naive_fallback_splits_on_literal_periods() {
        let segmenter = SentenceSegmenter::naive();
        let units = segmenter.segment("one. two.three . ");
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn naive_fallback_tolerates_empty_input() {
        let segmenter = SentenceSegmenter::naive();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("...").is_empty());
    }

    #[test]
    fn boundary_model_loads() {
        let model = BoundaryModel::load().expect("embedded table parses");
        assert!(model.abbreviations.contains("dr"));
        assert!(model.abbreviations.contains("u.s"));
    }
}
