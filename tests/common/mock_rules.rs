//! Mock Rules Engine for Testing
//!
//! Answers from a fixed move list and counts how often it is asked.

use chess::{Piece, Square};
use chessvoice::rules::{LegalMove, Position, RulesEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Rules engine with a scripted set of legal moves
pub struct MockRules {
    /// Moves reported as legal in every position
    pub moves: Vec<LegalMove>,
    /// Number of queries received (shared so it can be read after boxing)
    pub queries: Arc<AtomicUsize>,
}

impl MockRules {
    pub fn new(moves: Vec<LegalMove>) -> Self {
        Self {
            moves,
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A single legal move: white castles queen side
    pub fn queen_side_castle_only() -> Self {
        Self::new(vec![LegalMove {
            from: Square::E1,
            to: Square::C1,
            piece: Piece::King,
            promotion: None,
            san: "O-O-O".to_string(),
            uci: "e1c1".to_string(),
            is_capture: false,
        }])
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl RulesEngine for MockRules {
    fn name(&self) -> &str {
        "mock"
    }

    fn legal_moves(&self, _position: &Position) -> Vec<LegalMove> {
        self.count();
        self.moves.clone()
    }

    fn parse_and_validate(
        &self,
        _position: &Position,
        text: &str,
        _lenient: bool,
    ) -> Option<LegalMove> {
        self.count();
        self.moves
            .iter()
            .find(|m| m.uci == text || m.san == text)
            .cloned()
    }

    fn to_san(&self, _position: &Position, mv: &LegalMove) -> String {
        mv.san.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_counts_queries() {
        let rules = MockRules::queen_side_castle_only();
        let start = Position::starting();
        assert!(rules.parse_and_validate(&start, "O-O", true).is_none());
        assert_eq!(
            rules.parse_and_validate(&start, "e1c1", true).map(|m| m.san),
            Some("O-O-O".to_string())
        );
        assert_eq!(rules.legal_moves(&start).len(), 1);
        assert_eq!(rules.queries.load(Ordering::SeqCst), 3);
    }
}
