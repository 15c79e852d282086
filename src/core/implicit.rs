//! Implicit Destination Resolver
//!
//! Handles utterances that name only where a piece goes ("takes d5",
//! "knight h4"). A reading resolves only when exactly one legal move fits.

use super::candidates::{is_piece_token, is_promotion_token, is_square_token};
use crate::rules::{parse_square, piece_from_letter, LegalMove};
use chess::{Piece, Square};
use serde::Serialize;
use tracing::debug;

/// What the resolver concluded, for the trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImplicitOutcome {
    /// Exactly one legal move fits
    Unique { uci: String },
    /// Several legal moves fit; never guessed
    Ambiguous { count: usize },
    /// A destination was named but nothing legal fits
    NoMatch,
    /// No reading names a destination square
    NoDestination,
}

/// Constraints read from one normalized reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Constraints {
    dest: Square,
    piece: Piece,
    capture: bool,
    promotion: Option<Piece>,
}

impl Constraints {
    fn from_reading(reading: &str) -> Option<Self> {
        let tokens: Vec<&str> = reading.split_whitespace().collect();
        let dest = tokens
            .iter()
            .rev()
            .find(|t| is_square_token(t))
            .and_then(|t| parse_square(t))?;
        let piece = tokens
            .iter()
            .find(|t| is_piece_token(t))
            .and_then(|t| t.chars().next())
            .and_then(piece_from_letter)
            .unwrap_or(Piece::Pawn);
        let promotion = tokens
            .iter()
            .find(|t| is_promotion_token(t))
            .and_then(|t| t.chars().nth(1))
            .and_then(piece_from_letter);

        Some(Self {
            dest,
            piece,
            capture: tokens.contains(&"x"),
            promotion,
        })
    }

    /// Unspoken capture or promotion constrains nothing
    fn admits(&self, mv: &LegalMove) -> bool {
        mv.to == self.dest
            && mv.piece == self.piece
            && self.promotion.map_or(true, |p| mv.promotion == Some(p))
            && (!self.capture || mv.is_capture)
    }
}

/// Try each reading in order against the full legal move list
pub fn resolve_implicit(variants: &[String], legal: &[LegalMove]) -> ImplicitOutcome {
    let mut outcome = ImplicitOutcome::NoDestination;

    for reading in variants {
        let Some(constraints) = Constraints::from_reading(reading) else {
            continue;
        };

        let fitting: Vec<&LegalMove> = legal.iter().filter(|m| constraints.admits(m)).collect();
        debug!(
            "Implicit reading '{}' -> {:?}: {} fitting move(s)",
            reading,
            constraints,
            fitting.len()
        );

        match fitting.as_slice() {
            [only] => {
                return ImplicitOutcome::Unique {
                    uci: only.uci.clone(),
                }
            }
            [] => {
                if outcome == ImplicitOutcome::NoDestination {
                    outcome = ImplicitOutcome::NoMatch;
                }
            }
            many => {
                outcome = ImplicitOutcome::Ambiguous { count: many.len() };
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Position, RulesEngine, StandardRules};

    fn legal(fen: &str) -> Vec<LegalMove> {
        let position = Position::from_fen(fen).unwrap();
        StandardRules::new().legal_moves(&position)
    }

    fn readings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_unique_capture() {
        let moves = legal("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert_eq!(
            resolve_implicit(&readings(&["x d5"]), &moves),
            ImplicitOutcome::Unique {
                uci: "e4d5".to_string()
            }
        );
    }

    #[test]
    fn test_two_pawns_capture_same_square() {
        let moves = legal("rnbqkbnr/ppp1ppp1/7p/3p4/2P1P3/8/PP1P1PPP/RNBQKBNR w KQkq - 0 3");
        assert_eq!(
            resolve_implicit(&readings(&["x d5"]), &moves),
            ImplicitOutcome::Ambiguous { count: 2 }
        );
    }

    #[test]
    fn test_later_reading_can_resolve() {
        let moves = legal("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 0 1");
        let outcome = resolve_implicit(&readings(&["N 8 4", "N h4"]), &moves);
        assert_eq!(
            outcome,
            ImplicitOutcome::Unique {
                uci: "f3h4".to_string()
            }
        );
    }

    #[test]
    fn test_piece_and_destination() {
        let moves = legal("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(
            resolve_implicit(&readings(&["N c3"]), &moves),
            ImplicitOutcome::Unique {
                uci: "b1c3".to_string()
            }
        );
        assert_eq!(
            resolve_implicit(&readings(&["B c3"]), &moves),
            ImplicitOutcome::NoMatch
        );
        assert_eq!(
            resolve_implicit(&readings(&["O-O"]), &moves),
            ImplicitOutcome::NoDestination
        );
    }

    #[test]
    fn test_promotion_needs_piece() {
        let moves = legal("8/4P3/8/8/8/8/k7/4K3 w - - 0 1");
        assert_eq!(
            resolve_implicit(&readings(&["e8"]), &moves),
            ImplicitOutcome::Ambiguous { count: 4 }
        );
        assert_eq!(
            resolve_implicit(&readings(&["e8 =R"]), &moves),
            ImplicitOutcome::Unique {
                uci: "e7e8r".to_string()
            }
        );
    }
}
