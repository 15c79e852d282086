//! Move Humanizer
//!
//! Renders a move the way a player would say it: "knight f3",
//! "e takes d5", "castle king side", "e8 promotes to queen".

use crate::rules::{is_uci_shape, parse_square, piece_from_letter, piece_name, Position, RulesEngine};
use chess::Piece;

/// Spoken phrase for a move given as UCI or SAN
///
/// With a position, UCI is first converted to SAN by the rules engine.
/// Without one, UCI is read out square by square.
pub fn humanize(rules: &dyn RulesEngine, position: Option<&Position>, move_text: &str) -> String {
    let text = move_text.trim();

    if let Some(position) = position {
        if let Some(mv) = rules.parse_and_validate(position, text, true) {
            let san = rules.to_san(position, &mv);
            if let Some(phrase) = phrase_for_san(&san) {
                return phrase;
            }
        }
    }

    if is_uci_shape(text) {
        return uci_phrase(text);
    }

    phrase_for_san(text).unwrap_or_else(|| text.to_string())
}

/// Phrase for SAN text, `None` when it is not SAN-shaped
pub fn phrase_for_san(san: &str) -> Option<String> {
    let clean = san
        .trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));

    match clean.replace('0', "O").as_str() {
        "O-O" => return Some("castle king side".to_string()),
        "O-O-O" => return Some("castle queen side".to_string()),
        _ => {}
    }

    let (piece, rest) = match clean.chars().next() {
        Some(c) if c.is_ascii_uppercase() => (piece_from_letter(c)?, clean.get(1..)?),
        _ => (Piece::Pawn, clean),
    };

    let (body, promotion) = match rest.split_once('=') {
        Some((body, promo)) => (body, Some(piece_from_letter(promo.chars().next()?)?)),
        None => (rest, None),
    };
    if body.len() < 2 || !body.is_ascii() {
        return None;
    }

    let dest = &body[body.len() - 2..];
    parse_square(dest)?;
    let capture = body.contains('x');

    let phrase = match (piece, promotion) {
        (_, Some(promo)) => format!("{} promotes to {}", dest, piece_name(promo)),
        (Piece::Pawn, None) if capture => format!("{} takes {}", &body[..1], dest),
        (Piece::Pawn, None) => dest.to_string(),
        (piece, None) if capture => format!("{} takes {}", piece_name(piece), dest),
        (piece, None) => format!("{} {}", piece_name(piece), dest),
    };
    Some(phrase)
}

/// `uci` must have passed `is_uci_shape`
fn uci_phrase(uci: &str) -> String {
    let mut phrase = format!("{} to {}", &uci[0..2], &uci[2..4]);
    let promotion = uci[4..]
        .chars()
        .next()
        .and_then(|c| piece_from_letter(c.to_ascii_uppercase()));
    if let Some(promo) = promotion {
        phrase.push_str(" promotes to ");
        phrase.push_str(piece_name(promo));
    }
    phrase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StandardRules;

    #[test]
    fn test_phrase_for_san() {
        assert_eq!(phrase_for_san("Nf3").as_deref(), Some("knight f3"));
        assert_eq!(phrase_for_san("e4").as_deref(), Some("e4"));
        assert_eq!(phrase_for_san("exd5").as_deref(), Some("e takes d5"));
        assert_eq!(phrase_for_san("Bxc4+").as_deref(), Some("bishop takes c4"));
        assert_eq!(phrase_for_san("Rad1").as_deref(), Some("rook d1"));
        assert_eq!(phrase_for_san("O-O").as_deref(), Some("castle king side"));
        assert_eq!(phrase_for_san("O-O-O#").as_deref(), Some("castle queen side"));
        assert_eq!(
            phrase_for_san("e8=Q").as_deref(),
            Some("e8 promotes to queen")
        );
        assert_eq!(phrase_for_san("hello"), None);
    }

    #[test]
    fn test_humanize_with_position() {
        let rules = StandardRules::new();
        let start = Position::starting();
        assert_eq!(humanize(&rules, Some(&start), "g1f3"), "knight f3");
        assert_eq!(humanize(&rules, Some(&start), "e2e4"), "e4");
        assert_eq!(humanize(&rules, Some(&start), "Nc3"), "knight c3");
    }

    #[test]
    fn test_humanize_without_position() {
        let rules = StandardRules::new();
        assert_eq!(humanize(&rules, None, "g1f3"), "g1 to f3");
        assert_eq!(
            humanize(&rules, None, "e7e8q"),
            "e7 to e8 promotes to queen"
        );
        assert_eq!(humanize(&rules, None, "Qxd8"), "queen takes d8");
        assert_eq!(humanize(&rules, None, "gibberish"), "gibberish");
    }

    #[test]
    fn test_humanize_non_ascii() {
        let rules = StandardRules::new();
        let start = Position::starting();
        assert_eq!(humanize(&rules, None, "aé4"), "aé4");
        assert_eq!(humanize(&rules, Some(&start), "aé4"), "aé4");
        assert_eq!(humanize(&rules, None, "e2é4"), "e2é4");
        assert!(rules.parse_and_validate(&start, "aé4", true).is_none());
        assert!(rules.parse_and_validate(&start, "e2é4", false).is_none());
    }
}
