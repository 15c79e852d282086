//! Core resolution modules
//!
//! Pure stages of the transcript-to-move pipeline: text normalization,
//! candidate generation, legality matching, implicit destination
//! resolution, move humanizing and similarity suggestions.

pub mod candidates;
pub mod humanizer;
pub mod implicit;
pub mod matcher;
pub mod suggester;
pub mod text_normalizer;

pub use candidates::{generate_candidates, Candidate, CandidateRule};
pub use humanizer::{humanize, phrase_for_san};
pub use implicit::{resolve_implicit, ImplicitOutcome};
pub use matcher::{match_candidates, CandidateAttempt};
pub use suggester::{suggest, SuggestOutcome, Suggestion, SUGGESTION_THRESHOLD_PERCENT};
pub use text_normalizer::{NormalizedText, TextNormalizer};
