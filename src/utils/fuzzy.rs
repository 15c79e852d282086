//! Fuzzy matching utilities for move suggestions
//!
//! Levenshtein-based closeness between what was heard and how a move can be
//! written or said. Scores are kept as exact fractions so that threshold and
//! tie decisions never depend on floating point rounding.

use std::cmp::Ordering;
use strsim::levenshtein;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words that carry no move information when comparing renderings
const FILLER_WORDS: &[&str] = &[
    "the", "an", "um", "uh", "er", "erm", "please", "move", "my", "now", "just", "play",
];

/// Closeness of two strings: `1 - distance / max_len`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Similarity {
    pub distance: usize,
    pub max_len: usize,
}

impl Similarity {
    /// Score in [0, 1]. Two empty strings are identical.
    pub fn score(&self) -> f64 {
        if self.max_len == 0 {
            return 1.0;
        }
        1.0 - self.distance as f64 / self.max_len as f64
    }

    /// Exact comparison against a threshold given in percent
    pub fn meets_percent(&self, percent: usize) -> bool {
        if self.max_len == 0 {
            return true;
        }
        100 * (self.max_len - self.distance) >= percent * self.max_len
    }

    /// Compare two scores as fractions (cross-multiplied, no rounding)
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        let lhs = self.matched() * other.max_len.max(1);
        let rhs = other.matched() * self.max_len.max(1);
        lhs.cmp(&rhs)
    }

    fn matched(&self) -> usize {
        if self.max_len == 0 {
            1
        } else {
            self.max_len - self.distance
        }
    }
}

/// Strip accents: NFD decomposition with combining marks dropped
pub fn fold_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize text for similarity scoring
///
/// Case, punctuation, diacritics and filler words are ignored.
pub fn normalize_text(text: &str) -> String {
    let folded = fold_diacritics(text).to_lowercase();
    let spaced: String = folded
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    spaced
        .split_whitespace()
        .filter(|w| !FILLER_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity between two strings after normalization
pub fn compare(a: &str, b: &str) -> Similarity {
    let (a, b) = (normalize_text(a), normalize_text(b));
    Similarity {
        distance: levenshtein(&a, &b),
        max_len: a.chars().count().max(b.chars().count()),
    }
}

/// Calculate similarity score between two strings
#[cfg(test)]
pub fn similarity(a: &str, b: &str) -> f64 {
    compare(a, b).score()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Knight, F3!"), "knight f3");
        assert_eq!(normalize_text("  please   move the Rook  "), "rook");
        assert_eq!(normalize_text("Dame é4"), "dame e4");
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("éèêàç"), "eeeac");
        assert_eq!(fold_diacritics("plain"), "plain");
    }

    #[test]
    fn test_similarity_scores() {
        assert_eq!(similarity("knight f3", "Knight F3"), 1.0);
        assert!(similarity("night f3", "knight f3") > 0.85);
        assert!(similarity("castle", "e4") < 0.2);
    }

    #[test]
    fn test_threshold_is_exact() {
        // 9/20 is 0.45 exactly; the float form would round below it.
        let at = Similarity {
            distance: 11,
            max_len: 20,
        };
        assert!(at.meets_percent(45));
        let below = Similarity {
            distance: 14,
            max_len: 25,
        };
        assert!(!below.meets_percent(45));
        assert!((below.score() - 0.44).abs() < 1e-9);
    }

    #[test]
    fn test_fraction_ordering() {
        let half = Similarity {
            distance: 2,
            max_len: 4,
        };
        let same_half = Similarity {
            distance: 5,
            max_len: 10,
        };
        let better = Similarity {
            distance: 1,
            max_len: 4,
        };
        assert_eq!(half.cmp_score(&same_half), Ordering::Equal);
        assert_eq!(better.cmp_score(&half), Ordering::Greater);
    }
}
