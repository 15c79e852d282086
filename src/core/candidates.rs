//! Candidate Generator
//!
//! Turns normalized readings into move strings worth asking the rules
//! engine about. Output order is rule order, then reading order; duplicates
//! keep their first position.

use serde::Serialize;

/// How a candidate was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CandidateRule {
    /// The whole reading with spaces removed
    Direct,
    /// Move-relevant tokens glued, unknown words dropped
    SanShape,
    /// First two squares as from/to
    Coordinate,
    /// First two squares onto the last rank plus a promotion piece
    PromotionCoordinate,
    /// Literal castle token
    Castle,
}

impl CandidateRule {
    pub const ALL: [CandidateRule; 5] = [
        CandidateRule::Direct,
        CandidateRule::SanShape,
        CandidateRule::Coordinate,
        CandidateRule::PromotionCoordinate,
        CandidateRule::Castle,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub rule: CandidateRule,
    /// Index of the reading it came from
    pub variant: usize,
}

/// Build the ordered, distinct candidate list for all readings
pub fn generate_candidates(variants: &[String]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for rule in CandidateRule::ALL {
        for (variant, reading) in variants.iter().enumerate() {
            let Some(text) = apply_rule(rule, reading) else {
                continue;
            };
            if text.is_empty() || candidates.iter().any(|c| c.text == text) {
                continue;
            }
            candidates.push(Candidate {
                text,
                rule,
                variant,
            });
        }
    }

    candidates
}

fn apply_rule(rule: CandidateRule, reading: &str) -> Option<String> {
    match rule {
        CandidateRule::Direct => direct(reading),
        CandidateRule::SanShape => san_shape(reading),
        CandidateRule::Coordinate => coordinate(reading),
        CandidateRule::PromotionCoordinate => promotion_coordinate(reading),
        CandidateRule::Castle => castle(reading),
    }
}

fn is_move_char(c: char) -> bool {
    matches!(
        c,
        'a'..='h' | '1'..='8' | 'N' | 'B' | 'R' | 'Q' | 'K' | 'x' | '=' | '+' | '#' | 'O' | '-'
    )
}

pub(crate) fn is_square_token(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && (b'a'..=b'h').contains(&b[0]) && (b'1'..=b'8').contains(&b[1])
}

pub(crate) fn is_piece_token(token: &str) -> bool {
    matches!(token, "N" | "B" | "R" | "Q" | "K")
}

pub(crate) fn is_promotion_token(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && b[0] == b'=' && matches!(b[1], b'Q' | b'R' | b'B' | b'N')
}

fn is_san_token(token: &str) -> bool {
    let single = token.len() == 1
        && matches!(token.as_bytes()[0], b'a'..=b'h' | b'1'..=b'8' | b'x' | b'+' | b'#');
    single || is_square_token(token) || is_piece_token(token) || is_promotion_token(token)
}

fn direct(reading: &str) -> Option<String> {
    let compact: String = reading.split_whitespace().collect();
    compact.chars().all(is_move_char).then_some(compact)
}

fn san_shape(reading: &str) -> Option<String> {
    let glued: String = reading
        .split_whitespace()
        .filter(|t| is_san_token(t))
        .collect();
    (!glued.is_empty()).then_some(glued)
}

fn squares(reading: &str) -> Vec<&str> {
    reading
        .split_whitespace()
        .filter(|t| is_square_token(t))
        .collect()
}

fn coordinate(reading: &str) -> Option<String> {
    match squares(reading).as_slice() {
        [from, to, ..] => Some(format!("{}{}", from, to)),
        _ => None,
    }
}

fn promotion_coordinate(reading: &str) -> Option<String> {
    let (from, to) = match squares(reading).as_slice() {
        [from, to, ..] => (*from, *to),
        _ => return None,
    };
    let ranks = (from.as_bytes()[1], to.as_bytes()[1]);
    if ranks != (b'7', b'8') && ranks != (b'2', b'1') {
        return None;
    }
    let promo = reading
        .split_whitespace()
        .find(|t| is_promotion_token(t))?;
    Some(format!(
        "{}{}{}",
        from,
        to,
        promo[1..].to_ascii_lowercase()
    ))
}

/// Queen side wins when a reading names both castles
fn castle(reading: &str) -> Option<String> {
    let tokens: Vec<&str> = reading.split_whitespace().collect();
    ["O-O-O", "O-O"]
        .into_iter()
        .find(|castle| tokens.contains(castle))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(variants: &[&str]) -> Vec<String> {
        let variants: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
        generate_candidates(&variants)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }

    #[test]
    fn test_direct_and_dedup() {
        let candidates = generate_candidates(&["e2 e4".to_string()]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "e2e4");
        assert_eq!(candidates[0].rule, CandidateRule::Direct);
        assert_eq!(candidates[0].variant, 0);
    }

    #[test]
    fn test_unknown_words_dropped_in_san_shape() {
        assert_eq!(texts(&["N hello f3"]), vec!["Nf3"]);
    }

    #[test]
    fn test_coordinate_from_first_two_squares() {
        assert_eq!(
            texts(&["N g1 somewhere f3 e5"]),
            vec!["Ng1f3e5", "g1f3"]
        );
    }

    #[test]
    fn test_promotion_coordinate() {
        assert_eq!(texts(&["e7 e8 =Q"]), vec!["e7e8=Q", "e7e8", "e7e8q"]);
        assert_eq!(texts(&["d2 d1 =N"]), vec!["d2d1=N", "d2d1", "d2d1n"]);
        // Not onto the last rank
        assert_eq!(texts(&["e6 e7 =Q"]), vec!["e6e7=Q", "e6e7"]);
    }

    #[test]
    fn test_castle_prefers_queen_side() {
        assert_eq!(castle("O-O O-O-O").as_deref(), Some("O-O-O"));
        assert_eq!(castle("O-O").as_deref(), Some("O-O"));
        assert_eq!(castle("e4"), None);
    }

    #[test]
    fn test_castle_token() {
        let candidates = generate_candidates(&["O-O-O please".to_string()]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "O-O-O");
        assert_eq!(candidates[0].rule, CandidateRule::Castle);
    }

    #[test]
    fn test_rule_then_variant_order() {
        let candidates = generate_candidates(&["N 8 4".to_string(), "N h4".to_string()]);
        let summary: Vec<(String, CandidateRule, usize)> = candidates
            .into_iter()
            .map(|c| (c.text, c.rule, c.variant))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("N84".to_string(), CandidateRule::Direct, 0),
                ("Nh4".to_string(), CandidateRule::Direct, 1),
            ]
        );
    }

    #[test]
    fn test_empty_readings() {
        assert!(generate_candidates(&[]).is_empty());
        assert!(texts(&["hello there"]).is_empty());
    }
}
