//! Similarity Suggester
//!
//! Last resort when nothing named a legal move outright. Every legal move
//! is scored against the transcript through three renderings (SAN, UCI and
//! the spoken phrase); the single best move is offered for confirmation.

use super::humanizer::phrase_for_san;
use crate::rules::LegalMove;
use crate::utils::fuzzy::{compare, Similarity};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Minimum similarity for a suggestion, in percent (0.45)
pub const SUGGESTION_THRESHOLD_PERCENT: usize = 45;

/// A best-guess move awaiting a yes/no
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub uci: String,
    pub san: String,
    pub phrase: String,
    pub score: f64,
}

impl Suggestion {
    pub fn prompt(&self) -> String {
        format!("Did you mean {}?", self.phrase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SuggestOutcome {
    Suggested(Suggestion),
    /// The top score is shared by several moves
    Tied { score: f64, count: usize },
    BelowThreshold { score: f64 },
    NoMoves,
}

impl SuggestOutcome {
    pub fn best_score(&self) -> Option<f64> {
        match self {
            SuggestOutcome::Suggested(s) => Some(s.score),
            SuggestOutcome::Tied { score, .. } | SuggestOutcome::BelowThreshold { score } => {
                Some(*score)
            }
            SuggestOutcome::NoMoves => None,
        }
    }
}

struct Scored<'a> {
    mv: &'a LegalMove,
    phrase: String,
    similarity: Similarity,
}

/// Best rendering of one move against the transcript
fn score_move<'a>(transcript: &str, mv: &'a LegalMove) -> Scored<'a> {
    let phrase = phrase_for_san(&mv.san).unwrap_or_else(|| mv.san.clone());
    let similarity = [mv.uci.as_str(), phrase.as_str()]
        .iter()
        .map(|rendering| compare(transcript, rendering))
        .fold(compare(transcript, &mv.san), |best, s| {
            if s.cmp_score(&best) == Ordering::Greater {
                s
            } else {
                best
            }
        });

    Scored {
        mv,
        phrase,
        similarity,
    }
}

/// Pick the closest legal move, if it is close enough and unique
pub fn suggest(transcript: &str, legal: &[LegalMove]) -> SuggestOutcome {
    let scored: Vec<Scored> = legal.iter().map(|mv| score_move(transcript, mv)).collect();

    let Some(best) = scored
        .iter()
        .max_by(|a, b| a.similarity.cmp_score(&b.similarity))
    else {
        return SuggestOutcome::NoMoves;
    };

    let score = best.similarity.score();
    let tied = scored
        .iter()
        .filter(|s| s.similarity.cmp_score(&best.similarity) == Ordering::Equal)
        .count();

    debug!(
        "Best suggestion {} ({:.3}), {} move(s) at that score",
        best.mv.uci, score, tied
    );

    if tied > 1 {
        return SuggestOutcome::Tied { score, count: tied };
    }
    if !best.similarity.meets_percent(SUGGESTION_THRESHOLD_PERCENT) {
        return SuggestOutcome::BelowThreshold { score };
    }

    SuggestOutcome::Suggested(Suggestion {
        uci: best.mv.uci.clone(),
        san: best.mv.san.clone(),
        phrase: best.phrase.clone(),
        score,
    })
}
