//! Ratcliff/Obershelp similarity between character sequences.
//!
//! Recursively finds the longest common block, then matches the pieces to
//! its left and right, and scores `2 * matches / (len_a + len_b)`.

use std::collections::HashMap;

/// Ratcliff/Obershelp ratio of two strings in `[0.0, 1.0]`.
///
/// Two empty strings are identical and score `1.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    // Queue of unmatched (a, b) range pairs still to be searched.
    let mut matches = 0usize;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(&a, &b2j, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matches += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Longest block with `a[i..i + size] == b[j..j + size]`, `alo <= i < ahi`
/// and `blo <= j < bhi`. Ties go to the earliest block in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0;

    // j2len[j] is the length of the common run ending at a[i - 1], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_j2len = HashMap::new();
        if let Some(indices) = b2j.get(&a[i]) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = match j.checked_sub(1).and_then(|prev| j2len.get(&prev)) {
                    Some(&len) => len + 1,
                    None => 1,
                };
                next_j2len.insert(j, run);
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        j2len = next_j2len;
    }

    (best_i, best_j, best_size)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(ratio("hello world", "hello world"), 1.0);
    }

    #[test]
    fn both_empty_score_one() {
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn one_empty_scores_zero() {
        assert_eq!(ratio("hello", ""), 0.0);
        assert_eq!(ratio("", "hello"), 0.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn known_overlap_values() {
        // "bcd" is the longest common block: 2 * 3 / 8.
        assert_eq!(ratio("abcd", "bcde"), 0.75);
        assert_eq!(ratio("bcde", "abcd"), 0.75);
        // "itt" plus trailing "n": 2 * 4 / 13.
        assert!((ratio("kitten", "sitting") - 8.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn recursion_counts_blocks_on_both_sides() {
        // "the quick brown " (16) + " jumps" (6) + "o" (1) out of 50 chars.
        let score = ratio("the quick brown fox jumps", "the quick brown dog jumps");
        assert!((score - 0.92).abs() < 1e-9);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let a: Vec<char> = "abab".chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in "ab".char_indices() {
            b2j.entry(c).or_default().push(j);
        }
        let (i, j, size) = longest_match(&a, &b2j, 0, 4, 0, 2);
        assert_eq!((i, j, size), (0, 0, 2));
    }

    #[test]
    fn multibyte_characters_compare_by_char() {
        assert_eq!(ratio("héllo", "héllo"), 1.0);
        assert!(ratio("héllo", "hello") > 0.5);
    }
}
