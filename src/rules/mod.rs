//! Rules Engine Module
//!
//! The chess rules collaborator consumed by the resolver. The resolver only
//! ever asks three things of it: which moves are legal right now, does this
//! text name one of them, and how is a move written.
//!
//! - Standard: adapter over the `chess` crate move generator

pub mod standard;

use crate::config::Config;
use crate::error::{VoiceError, VoiceResult};
use chess::{Board, BoardStatus, ChessMove, Color, File, Piece, Rank, Square};
use std::fmt;
use std::str::FromStr;

// Re-export main types
pub use standard::StandardRules;

/// An immutable board snapshot handed to the resolver for one call
#[derive(Clone, Copy, PartialEq)]
pub struct Position {
    board: Board,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.board)
    }
}

impl Position {
    /// The standard starting position
    pub fn starting() -> Self {
        Self {
            board: Board::default(),
        }
    }

    /// Build a position from FEN text
    pub fn from_fen(fen: &str) -> VoiceResult<Self> {
        let board = Board::from_str(fen.trim())
            .map_err(|e| VoiceError::Rules(format!("invalid FEN '{}': {:?}", fen, e)))?;
        Ok(Self { board })
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Position after playing `mv`. The move must come from this position's legal list.
    pub fn after(&self, mv: &LegalMove) -> Position {
        Self {
            board: self.board.make_move_new(mv.chess_move()),
        }
    }

    /// The same placement with `color` to move; `None` if the other side is in check
    pub fn with_side_to_move(&self, color: Color) -> Option<Position> {
        if self.side_to_move() == color {
            return Some(*self);
        }
        self.board.null_move().map(|board| Self { board })
    }

    pub fn occupant(&self, square: Square) -> Option<(Color, Piece)> {
        Some((self.board.color_on(square)?, self.board.piece_on(square)?))
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }
}

/// A legal move as reported by the rules engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub san: String,
    pub uci: String,
    pub is_capture: bool,
}

impl LegalMove {
    pub fn chess_move(&self) -> ChessMove {
        ChessMove::new(self.from, self.to, self.promotion)
    }

    pub fn is_castle(&self) -> bool {
        self.piece == Piece::King && file_distance(self.from, self.to) == 2
    }
}

/// Trait for chess rules engines
///
/// Implementations must answer for exactly the position they are given;
/// nothing may be cached across positions.
pub trait RulesEngine: Send + Sync {
    /// Get the engine name
    fn name(&self) -> &str;

    /// Every legal move for the side to move
    fn legal_moves(&self, position: &Position) -> Vec<LegalMove>;

    /// Parse `text` as UCI or SAN and return it if legal in `position`.
    /// `lenient` tolerates missing capture marks, `=` and check suffixes.
    fn parse_and_validate(&self, position: &Position, text: &str, lenient: bool)
        -> Option<LegalMove>;

    /// SAN for a legal move, with disambiguation and check marks
    fn to_san(&self, position: &Position, mv: &LegalMove) -> String;

    /// Coordinate notation, e.g. "g1f3" or "e7e8q"
    fn to_uci(&self, mv: &LegalMove) -> String {
        uci_string(mv.from, mv.to, mv.promotion)
    }
}

/// Factory to create the configured rules engine
///
/// An unknown engine is a startup configuration error, never a per-call one.
pub fn create_engine(config: &Config) -> VoiceResult<Box<dyn RulesEngine>> {
    match config.rules_engine.as_str() {
        "standard" | "chess" => Ok(Box::new(StandardRules::new())),
        other => Err(VoiceError::Config(format!(
            "unknown rules engine '{}' (expected 'standard')",
            other
        ))),
    }
}

/// Parse "e4" into a square
pub fn parse_square(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0].to_ascii_lowercase(), bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(Square::make_square(
        Rank::from_index((rank - b'1') as usize),
        File::from_index((file - b'a') as usize),
    ))
}

/// True for 4-5 character coordinate text ("e2e4", "e7e8q")
pub fn is_uci_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    if !text.is_ascii() || (bytes.len() != 4 && bytes.len() != 5) {
        return false;
    }
    parse_square(&text[0..2]).is_some()
        && parse_square(&text[2..4]).is_some()
        && bytes
            .get(4)
            .map_or(true, |b| matches!(b.to_ascii_lowercase(), b'q' | b'r' | b'b' | b'n'))
}

pub fn uci_string(from: Square, to: Square, promotion: Option<Piece>) -> String {
    let promo = promotion
        .map(|p| piece_letter(p).to_ascii_lowercase().to_string())
        .unwrap_or_default();
    format!("{}{}{}", from, to, promo)
}

/// SAN letter for a piece (pawns get 'P' though SAN omits it)
pub fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// Uppercase SAN letter to piece; pawns have no letter
pub fn piece_from_letter(letter: char) -> Option<Piece> {
    match letter {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

/// Spoken name of a piece
pub fn piece_name(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "pawn",
        Piece::Knight => "knight",
        Piece::Bishop => "bishop",
        Piece::Rook => "rook",
        Piece::Queen => "queen",
        Piece::King => "king",
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

pub(crate) fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

pub(crate) fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

fn file_distance(a: Square, b: Square) -> usize {
    let (fa, fb) = (a.get_file().to_index(), b.get_file().to_index());
    fa.max(fb) - fa.min(fb)
}
