#![allow(dead_code)]

pub mod mock_rules;

use chessvoice::rules::StandardRules;
use chessvoice::{Position, VoiceResolver};

/// After 1.e4 e5 2.Nf3 Nc6 3.Bc4 Bc5; white can castle
pub const ITALIAN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

/// Both white castles legal
pub const BOTH_CASTLES: &str = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";

/// White pawns on c4 and e4 can both take on d5
pub const TWO_PAWNS_ON_D5: &str =
    "rnbqkbnr/ppp1ppp1/7p/3p4/2P1P3/8/PP1P1PPP/RNBQKBNR w KQkq - 0 3";

pub fn standard_resolver() -> VoiceResolver {
    VoiceResolver::new(Box::new(StandardRules::new()))
}

pub fn position(fen: &str) -> Position {
    Position::from_fen(fen).expect("Failed to parse test FEN")
}
