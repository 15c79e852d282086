//! Utility modules

pub mod fuzzy;

pub use fuzzy::{compare, fold_diacritics, normalize_text, Similarity};
#[cfg(test)]
pub use fuzzy::similarity;
