//! Standard rules adapter
//!
//! Legal move generation comes from the `chess` crate; this adapter only adds
//! notation: SAN rendering and a lenient SAN/UCI reader.

use super::{
    file_char, parse_square, piece_from_letter, rank_char, uci_string, LegalMove, Position,
    RulesEngine,
};
use chess::{Board, ChessMove, MoveGen, Piece};

/// Rules engine backed by the `chess` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl StandardRules {
    pub fn new() -> Self {
        Self
    }

    fn describe(board: &Board, mv: ChessMove, legal: &[ChessMove]) -> LegalMove {
        let piece = board.piece_on(mv.get_source()).unwrap_or(Piece::Pawn);
        LegalMove {
            from: mv.get_source(),
            to: mv.get_dest(),
            piece,
            promotion: mv.get_promotion(),
            san: san_for(board, mv, legal),
            uci: uci_string(mv.get_source(), mv.get_dest(), mv.get_promotion()),
            is_capture: is_capture(board, mv),
        }
    }

    fn find_uci(legal: &[ChessMove], text: &str) -> Option<ChessMove> {
        let text = text.to_ascii_lowercase();
        if !super::is_uci_shape(&text) {
            return None;
        }
        let from = parse_square(&text[0..2])?;
        let to = parse_square(&text[2..4])?;
        let promotion = text[4..]
            .chars()
            .next()
            .and_then(|c| piece_from_letter(c.to_ascii_uppercase()));

        legal.iter().copied().find(|m| {
            m.get_source() == from && m.get_dest() == to && m.get_promotion() == promotion
        })
    }

    fn find_san(board: &Board, legal: &[ChessMove], text: &str, lenient: bool) -> Option<ChessMove> {
        let clean = text
            .trim()
            .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
        if clean.is_empty() || !clean.is_ascii() {
            return None;
        }

        if let Some(kingside) = castle_side(clean, lenient) {
            return legal.iter().copied().find(|m| {
                let (src, dst) = (m.get_source(), m.get_dest());
                board.piece_on(src) == Some(Piece::King) && {
                    let (sf, df) = (src.get_file().to_index(), dst.get_file().to_index());
                    if kingside {
                        df == sf + 2
                    } else {
                        sf == df + 2
                    }
                }
            });
        }

        let (piece, rest) = match clean.chars().next() {
            Some(c) if c.is_ascii_uppercase() => (piece_from_letter(c)?, &clean[1..]),
            _ => (Piece::Pawn, clean),
        };

        let (rest, promotion) = match rest.find('=') {
            Some(idx) => {
                let letter = rest[idx + 1..].chars().next()?.to_ascii_uppercase();
                (&rest[..idx], Some(piece_from_letter(letter)?))
            }
            None => split_bare_promotion(rest, piece, lenient),
        };

        let wants_capture = rest.contains('x');
        let rest: String = rest
            .chars()
            .filter(|c| *c != 'x' && !(lenient && *c == '-'))
            .collect();
        if rest.len() < 2 {
            return None;
        }

        let dest = parse_square(&rest[rest.len() - 2..])?;
        let disambig = &rest[..rest.len() - 2];
        if !disambig
            .bytes()
            .all(|b| (b'a'..=b'h').contains(&b) || (b'1'..=b'8').contains(&b))
        {
            return None;
        }

        let candidates: Vec<ChessMove> = legal
            .iter()
            .copied()
            .filter(|m| {
                let src = m.get_source();
                m.get_dest() == dest
                    && board.piece_on(src) == Some(piece)
                    && m.get_promotion() == promotion
                    && disambig.bytes().all(|b| {
                        if b.is_ascii_lowercase() {
                            file_char(src) as u8 == b
                        } else {
                            rank_char(src) as u8 == b
                        }
                    })
                    && (lenient || is_capture(board, *m) == wants_capture)
            })
            .collect();

        match candidates.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl RulesEngine for StandardRules {
    fn name(&self) -> &str {
        "standard"
    }

    fn legal_moves(&self, position: &Position) -> Vec<LegalMove> {
        let board = position.board();
        let legal: Vec<ChessMove> = MoveGen::new_legal(board).collect();
        legal
            .iter()
            .map(|m| Self::describe(board, *m, &legal))
            .collect()
    }

    fn parse_and_validate(
        &self,
        position: &Position,
        text: &str,
        lenient: bool,
    ) -> Option<LegalMove> {
        let board = position.board();
        let legal: Vec<ChessMove> = MoveGen::new_legal(board).collect();
        let mv = Self::find_uci(&legal, text).or_else(|| Self::find_san(board, &legal, text, lenient))?;
        Some(Self::describe(board, mv, &legal))
    }

    fn to_san(&self, position: &Position, mv: &LegalMove) -> String {
        let board = position.board();
        let legal: Vec<ChessMove> = MoveGen::new_legal(board).collect();
        san_for(board, mv.chess_move(), &legal)
    }
}

/// `Some(true)` for king side, `Some(false)` for queen side
fn castle_side(text: &str, lenient: bool) -> Option<bool> {
    let upper = text.to_ascii_uppercase().replace('0', "O");
    match upper.as_str() {
        "O-O" => Some(true),
        "O-O-O" => Some(false),
        "OO" if lenient => Some(true),
        "OOO" if lenient => Some(false),
        _ => None,
    }
}

/// Lenient "e8Q" style promotion without the '='
fn split_bare_promotion(rest: &str, piece: Piece, lenient: bool) -> (&str, Option<Piece>) {
    if !lenient || piece != Piece::Pawn || rest.len() < 3 {
        return (rest, None);
    }
    let bytes = rest.as_bytes();
    let last = bytes[bytes.len() - 1].to_ascii_uppercase() as char;
    let before = bytes[bytes.len() - 2];
    match piece_from_letter(last) {
        Some(promo) if promo != Piece::King && (before == b'8' || before == b'1') => {
            (&rest[..rest.len() - 1], Some(promo))
        }
        _ => (rest, None),
    }
}

fn is_capture(board: &Board, mv: ChessMove) -> bool {
    let (src, dst) = (mv.get_source(), mv.get_dest());
    board.piece_on(dst).is_some()
        || (board.piece_on(src) == Some(Piece::Pawn) && src.get_file() != dst.get_file())
}

fn san_for(board: &Board, mv: ChessMove, legal: &[ChessMove]) -> String {
    let (src, dst) = (mv.get_source(), mv.get_dest());
    let piece = board.piece_on(src).unwrap_or(Piece::Pawn);
    let capture = is_capture(board, mv);
    let mut san = String::new();

    let (sf, df) = (src.get_file().to_index(), dst.get_file().to_index());
    if piece == Piece::King && sf.abs_diff(df) == 2 {
        san.push_str(if df > sf { "O-O" } else { "O-O-O" });
    } else if piece == Piece::Pawn {
        if capture {
            san.push(file_char(src));
            san.push('x');
        }
        san.push_str(&dst.to_string());
        if let Some(promo) = mv.get_promotion() {
            san.push('=');
            san.push(super::piece_letter(promo));
        }
    } else {
        san.push(super::piece_letter(piece));
        let rivals: Vec<_> = legal
            .iter()
            .map(|m| m.get_source())
            .filter(|s| {
                *s != src
                    && board.piece_on(*s) == Some(piece)
                    && legal
                        .iter()
                        .any(|m| m.get_source() == *s && m.get_dest() == dst)
            })
            .collect();
        if !rivals.is_empty() {
            let shares_file = rivals.iter().any(|s| s.get_file() == src.get_file());
            let shares_rank = rivals.iter().any(|s| s.get_rank() == src.get_rank());
            if !shares_file {
                san.push(file_char(src));
            } else if !shares_rank {
                san.push(rank_char(src));
            } else {
                san.push(file_char(src));
                san.push(rank_char(src));
            }
        }
        if capture {
            san.push('x');
        }
        san.push_str(&dst.to_string());
    }

    let after = board.make_move_new(mv);
    if after.checkers().popcnt() > 0 {
        san.push(if MoveGen::new_legal(&after).len() == 0 {
            '#'
        } else {
            '+'
        });
    }
    san
}
