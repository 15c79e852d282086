//! Legality Matcher
//!
//! Asks the rules engine about each candidate in order. The first legal
//! hit wins; every attempt up to it is kept for the trace.

use super::candidates::{Candidate, CandidateRule};
use crate::rules::{LegalMove, Position, RulesEngine};
use serde::Serialize;
use tracing::debug;

/// One candidate and what the rules engine said about it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAttempt {
    pub text: String,
    pub rule: CandidateRule,
    pub variant: usize,
    /// UCI of the legal move, if the candidate named one
    pub matched: Option<String>,
}

/// Validate candidates in order; stop at the first legal move
pub fn match_candidates(
    rules: &dyn RulesEngine,
    position: &Position,
    candidates: &[Candidate],
) -> (Option<LegalMove>, Vec<CandidateAttempt>) {
    let mut attempts = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let hit = rules.parse_and_validate(position, &candidate.text, true);
        attempts.push(CandidateAttempt {
            text: candidate.text.clone(),
            rule: candidate.rule,
            variant: candidate.variant,
            matched: hit.as_ref().map(|m| m.uci.clone()),
        });

        if let Some(mv) = hit {
            debug!(
                "Candidate '{}' ({:?}) is legal: {}",
                candidate.text, candidate.rule, mv.uci
            );
            return (Some(mv), attempts);
        }
    }

    (None, attempts)
}
