//! Assistant commands
//!
//! The deterministic side of the chess assistant: move recaps, board
//! questions for the player, and grading of spoken answers.

use crate::commands::{TestRequest, TestTopic};
use crate::core::text_normalizer::{phonetic_fixes, strip_punctuation};
use crate::core::TextNormalizer;
use crate::game::PlayedMove;
use crate::rules::{color_name, parse_square, piece_name, Position, RulesEngine};
use chess::{Color, Piece, Square, ALL_SQUARES};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// What a correct answer must contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Count(usize),
    /// Every square, in any order
    Squares(Vec<Square>),
    /// `None` for an empty square
    Occupant(Option<(Color, Piece)>),
}

/// An open question put to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestQuestion {
    pub topic: TestTopic,
    pub prompt: String,
    /// The answer as it would be read out
    pub answer: String,
    pub expected: Expected,
}

/// Numbered move pairs, e.g. "1. e4 e5, 2. Nf3. 3 moves played."
pub fn recap(history: &[PlayedMove]) -> String {
    let Some(first) = history.first() else {
        return "No moves have been played yet.".to_string();
    };

    let mut parts = Vec::new();
    let mut number = 1;
    let mut rest = history;
    if first.color == Color::Black {
        parts.push(format!("1... {}", first.san));
        rest = &history[1..];
        number = 2;
    }

    for pair in rest.chunks(2) {
        match pair {
            [white, black] => parts.push(format!("{}. {} {}", number, white.san, black.san)),
            [white] => parts.push(format!("{}. {}", number, white.san)),
            _ => {}
        }
        number += 1;
    }

    let noun = if history.len() == 1 { "move" } else { "moves" };
    format!("{}. {} {} played.", parts.join(", "), history.len(), noun)
}

/// "a white knight" or "nothing"
pub fn describe_square(position: &Position, square: Square) -> String {
    match position.occupant(square) {
        Some((color, piece)) => format!("a {} {}", color_name(color), piece_name(piece)),
        None => "nothing".to_string(),
    }
}

/// Squares holding `color`'s pieces of one kind, a1 first
pub fn locate_pieces(position: &Position, color: Color, piece: Piece) -> Vec<Square> {
    let board = position.board();
    (*board.pieces(piece) & *board.color_combined(color)).collect()
}

/// Build a question; unset topic and color are picked for the player
pub fn test_question<R: Rng + ?Sized>(
    position: &Position,
    rules: &dyn RulesEngine,
    request: &TestRequest,
    rng: &mut R,
) -> TestQuestion {
    let topic = request
        .topic
        .or_else(|| TestTopic::ALL.choose(rng).copied())
        .unwrap_or(TestTopic::What);
    let color = request.color.unwrap_or_else(|| position.side_to_move());

    let question = match topic {
        TestTopic::Checks | TestTopic::Captures => move_question(position, rules, topic, color),
        TestTopic::Where => where_question(position, color, rng),
        TestTopic::What => what_question(position, rng),
    };
    debug!("Test question: {} (answer: {})", question.prompt, question.answer);
    question
}

fn move_question(
    position: &Position,
    rules: &dyn RulesEngine,
    topic: TestTopic,
    color: Color,
) -> TestQuestion {
    // The side not to move can only be asked about when the mover is not in check
    let (view, color) = match position.with_side_to_move(color) {
        Some(view) => (view, color),
        None => (*position, position.side_to_move()),
    };

    let sans: Vec<String> = rules
        .legal_moves(&view)
        .into_iter()
        .filter(|m| match topic {
            TestTopic::Checks => m.san.ends_with('+') || m.san.ends_with('#'),
            _ => m.is_capture,
        })
        .map(|m| m.san)
        .collect();

    let prompt = match topic {
        TestTopic::Checks => format!("How many checking moves does {} have?", color_name(color)),
        _ => format!("How many captures can {} make?", color_name(color)),
    };
    let answer = if sans.is_empty() {
        "None.".to_string()
    } else {
        format!("{}: {}.", sans.len(), sans.join(", "))
    };

    TestQuestion {
        topic,
        prompt,
        answer,
        expected: Expected::Count(sans.len()),
    }
}

fn where_question<R: Rng + ?Sized>(position: &Position, color: Color, rng: &mut R) -> TestQuestion {
    let present: Vec<(Piece, Vec<Square>)> = [
        Piece::King,
        Piece::Queen,
        Piece::Rook,
        Piece::Bishop,
        Piece::Knight,
    ]
    .into_iter()
    .map(|piece| (piece, locate_pieces(position, color, piece)))
    .filter(|(_, squares)| !squares.is_empty())
    .collect();

    let (piece, squares) = present
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| (Piece::King, locate_pieces(position, color, Piece::King)));

    let prompt = if squares.len() == 1 {
        format!("Where is the {} {}?", color_name(color), piece_name(piece))
    } else {
        format!("Where are the {} {}s?", color_name(color), piece_name(piece))
    };
    let answer = squares
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" and ");

    TestQuestion {
        topic: TestTopic::Where,
        prompt,
        answer,
        expected: Expected::Squares(squares),
    }
}

fn what_question<R: Rng + ?Sized>(position: &Position, rng: &mut R) -> TestQuestion {
    let square = ALL_SQUARES[rng.gen_range(0..ALL_SQUARES.len())];
    TestQuestion {
        topic: TestTopic::What,
        prompt: format!("What is on {}?", square),
        answer: describe_square(position, square),
        expected: Expected::Occupant(position.occupant(square)),
    }
}

fn piece_from_word(word: &str) -> Option<Piece> {
    match word.trim_end_matches('s') {
        "pawn" => Some(Piece::Pawn),
        "knight" => Some(Piece::Knight),
        "bishop" => Some(Piece::Bishop),
        "rook" => Some(Piece::Rook),
        "queen" => Some(Piece::Queen),
        "king" => Some(Piece::King),
        _ => None,
    }
}

fn spoken_count(answer: &str, normalizer: &TextNormalizer) -> Option<usize> {
    answer
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|token| match token {
            "none" | "no" | "nothing" | "zero" => Some(0),
            _ => normalizer.parse_number(token).map(|n| n as usize),
        })
}

fn spoken_squares(answer: &str, normalizer: &TextNormalizer) -> Vec<Vec<Square>> {
    normalizer
        .normalize(answer)
        .variants
        .iter()
        .map(|reading| {
            let mut squares: Vec<Square> =
                reading.split_whitespace().filter_map(parse_square).collect();
            squares.sort();
            squares.dedup();
            squares
        })
        .collect()
}

/// Check a spoken answer against the question
pub fn grade(question: &TestQuestion, answer: &str, normalizer: &TextNormalizer) -> bool {
    match &question.expected {
        Expected::Count(n) => spoken_count(answer, normalizer) == Some(*n),
        Expected::Squares(expected) => {
            let mut expected = expected.clone();
            expected.sort();
            spoken_squares(answer, normalizer)
                .iter()
                .any(|squares| *squares == expected)
        }
        Expected::Occupant(expected) => {
            let text = phonetic_fixes(&strip_punctuation(answer));
            let words: Vec<&str> = text.split_whitespace().collect();
            let piece = words.iter().find_map(|w| piece_from_word(w));
            let color = words.iter().find_map(|w| match *w {
                "white" => Some(Color::White),
                "black" => Some(Color::Black),
                _ => None,
            });

            match expected {
                None => {
                    piece.is_none()
                        && words
                            .iter()
                            .any(|w| matches!(*w, "nothing" | "empty" | "none"))
                }
                Some((want_color, want_piece)) => {
                    piece == Some(*want_piece) && color.map_or(true, |c| c == *want_color)
                }
            }
        }
    }
}
