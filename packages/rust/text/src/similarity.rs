//! Cosine similarity over term-frequency vectors.

use std::collections::HashMap;

/// Cosine similarity of two texts under whitespace tokenization.
///
/// Tokens are compared case-sensitively. Returns a score in `[0.0, 1.0]`;
/// if either text has no tokens the score is `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let counts_a = term_counts(a);
    let counts_b = term_counts(b);

    let dot: u64 = counts_a
        .iter()
        .filter_map(|(term, &count)| counts_b.get(term).map(|&other| count * other))
        .sum();

    // One sqrt over the integer squared norms, so identical vectors divide
    // to exactly 1.0.
    let denom = (norm_sq(&counts_a) as f64 * norm_sq(&counts_b) as f64).sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    (dot as f64 / denom).min(1.0)
}

fn term_counts(text: &str) -> HashMap<&str, u64> {
    let mut counts = HashMap::new();
    for token in text.split_whitespace() {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn norm_sq(counts: &HashMap<&str, u64>) -> u64 {
    counts.values().map(|&count| count * count).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
