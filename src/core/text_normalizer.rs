//! Text Normalization
//!
//! Rewrites a raw transcript into canonical move tokens before candidate
//! generation. The rewrite rules are pure and run in the order of [`RULES`];
//! that order is part of the contract:
//!
//! 1. `fold_diacritics`
//! 2. `strip_punctuation` (lowercases; keeps `=`, `+`, `#`)
//! 3. `collapse_whitespace`
//! 4. `phonetic_fixes` (misheard piece names, letter homophones, glued moves)
//! 5. `number_words` (homophones like "to" only after a lone file letter)
//! 6. `piece_names`
//! 7. `castling`
//! 8. `captures`
//! 9. `promotions`
//! 10. `fillers`
//!
//! After the rules, alternative readings are expanded (a misheard `8` for
//! file `h`, a lone `b` for bishop) and squares are joined in every reading.
//!
//! Output tokens: piece letters `N B R Q K`, squares `e4`, capture `x`,
//! promotion `=Q`, castles `O-O` / `O-O-O`.

use crate::utils::fold_diacritics;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// A named, pure rewrite step
#[derive(Clone, Copy)]
pub struct RewriteRule {
    pub name: &'static str,
    pub rewrite: fn(&str) -> String,
}

/// The normalization rules, in application order
pub const RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "fold_diacritics",
        rewrite: fold_diacritics,
    },
    RewriteRule {
        name: "strip_punctuation",
        rewrite: strip_punctuation,
    },
    RewriteRule {
        name: "collapse_whitespace",
        rewrite: collapse_whitespace,
    },
    RewriteRule {
        name: "phonetic_fixes",
        rewrite: phonetic_fixes,
    },
    RewriteRule {
        name: "number_words",
        rewrite: number_words,
    },
    RewriteRule {
        name: "piece_names",
        rewrite: piece_names,
    },
    RewriteRule {
        name: "castling",
        rewrite: castling,
    },
    RewriteRule {
        name: "captures",
        rewrite: captures,
    },
    RewriteRule {
        name: "promotions",
        rewrite: promotions,
    },
    RewriteRule {
        name: "fillers",
        rewrite: fillers,
    },
];

/// Number words that always denote a digit
const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("oh", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
];

/// Homophones that denote a rank only right after a file letter ("e to" = e2)
const RANK_HOMOPHONES: &[(&str, &str)] = &[
    ("won", "1"),
    ("to", "2"),
    ("too", "2"),
    ("tu", "2"),
    ("tree", "3"),
    ("free", "3"),
    ("for", "4"),
    ("fore", "4"),
    ("fife", "5"),
    ("sicks", "6"),
    ("ate", "8"),
    ("ait", "8"),
];

const LETTER_HOMOPHONES: &[(&str, &str)] = &[
    ("ay", "a"),
    ("bee", "b"),
    ("cee", "c"),
    ("see", "c"),
    ("sea", "c"),
    ("dee", "d"),
    ("ee", "e"),
    ("eee", "e"),
    ("ef", "f"),
    ("eff", "f"),
    ("gee", "g"),
    ("jee", "g"),
    ("aitch", "h"),
    ("etch", "h"),
];

const PIECE_WORDS: &[(&str, &str)] = &[
    ("knight", "N"),
    ("bishop", "B"),
    ("rook", "R"),
    ("queen", "Q"),
    ("king", "K"),
    ("pawn", ""),
    ("pawns", ""),
];

const CAPTURE_WORDS: &[&str] = &[
    "take",
    "takes",
    "taking",
    "took",
    "capture",
    "captures",
    "captured",
    "capturing",
    "by",
    "ex",
    "x",
];

const FILLER_WORDS: &[&str] = &[
    "to", "too", "into", "towards", "toward", "on", "and", "then", "than", "the", "a", "an",
    "move", "moves", "my", "your", "this", "that", "with", "from", "at", "is", "was", "are",
    "please", "just", "i", "um", "uh", "er", "go", "goes", "square", "lets", "let's",
];

lazy_static! {
    static ref PHONETIC_PHRASES: Vec<(Regex, &'static str)> = [
        (r"\b(?:b|be|bee)\s*(?:shop|shup|sharp|soup|sop|sub|shock)\b", "bishop"),
        (r"\b(?:eshop|bsop|biship|beshop|bshop)\b", "bishop"),
        (r"\b(?:night|nite|knite)\b", "knight"),
        (r"\b(?:rock|ruck|ruke)\b", "rook"),
        (r"\bquin\b", "queen"),
        (r"\bkeying\b", "king"),
        (r"\bprawn\b", "pawn"),
    ]
    .iter()
    .map(|(pattern, to)| (Regex::new(pattern).expect("valid phonetic pattern"), *to))
    .collect();

    static ref CASTLE_PATTERNS: Vec<(Regex, &'static str)> = {
        let castle = r"(?:castles?|castling)";
        let side = r"(?:side|sigh|sign)";
        let queen = format!(r"(?:Q\s*{side}|queenside|long(?:\s*{side})?)");
        let king = format!(r"(?:K\s*{side}|kingside|short(?:\s*{side})?)");
        // "castle on the queen side": fillers are only dropped later
        let gap = r"(?:\s+(?:on|to|the|a|my|towards?))*\s+";
        [
            (format!(r"\b{castle}{gap}{queen}\b"), "O-O-O"),
            (format!(r"\b{queen}\s+{castle}\b"), "O-O-O"),
            (format!(r"\bQ\s*{side}\b|\bqueenside\b"), "O-O-O"),
            (r"\b[o0]\s*[o0]\s*[o0]\b".to_string(), "O-O-O"),
            (format!(r"\b{castle}{gap}{king}\b"), "O-O"),
            (format!(r"\b{king}\s+{castle}\b"), "O-O"),
            (format!(r"\bK\s*{side}\b|\bkingside\b"), "O-O"),
            (r"\b[o0]\s*[o0]\b".to_string(), "O-O"),
        ]
        .into_iter()
        .map(|(pattern, to)| (Regex::new(&pattern).expect("valid castle pattern"), to))
        .collect()
    };

    static ref BARE_CASTLE: Regex =
        Regex::new(r"\b(?:castles?|castling)\b").expect("valid castle pattern");

    static ref PROMOTION: Regex = Regex::new(
        r"(?:\b(?:promotes?|promoted|promoting|promotion|equals?|becomes?)\b|=)\s*(?:(?:to|into|a|an|the)\s+)*([QRBN])\b"
    )
    .expect("valid promotion pattern");

    static ref GLUED_COORDINATE: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbn])?$").expect("valid pattern");
    static ref GLUED_PIECE: Regex =
        Regex::new(r"^([nrqk])([a-h]?[1-8]?)(x?)([a-h][1-8])$").expect("valid pattern");
    static ref GLUED_PAWN: Regex =
        Regex::new(r"^([a-h])(x?)([a-h][1-8])(?:=?([qrbn]))?$").expect("valid pattern");
    static ref GLUED_PROMOTION: Regex =
        Regex::new(r"^([a-h][1-8])=?([qrbn])$").expect("valid pattern");
}

/// Normalizer output: the primary reading first, then alternatives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    pub variants: Vec<String>,
    pub applied_rules: Vec<String>,
}

impl NormalizedText {
    pub fn primary(&self) -> &str {
        self.variants.first().map(String::as_str).unwrap_or("")
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.variants.iter().all(|v| v.is_empty())
    }
}

/// Normalizes spoken moves into canonical tokens
pub struct TextNormalizer {
    /// Manual corrections from config, longest phrase first
    corrections: Vec<(Regex, String)>,
    /// Number word mappings
    number_words: HashMap<&'static str, u32>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl TextNormalizer {
    /// Create a new text normalizer
    pub fn new(corrections: HashMap<String, String>) -> Self {
        let mut ordered: Vec<(String, String)> = corrections.into_iter().collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let corrections = ordered
            .into_iter()
            .filter_map(|(from, to)| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(from.trim()));
                match Regex::new(&pattern) {
                    Ok(re) => Some((re, to)),
                    Err(e) => {
                        warn!("⚠️ Ignoring voice correction '{}': {}", from, e);
                        None
                    }
                }
            })
            .collect();

        let mut number_words = HashMap::new();
        for (word, num) in [
            ("zero", 0),
            ("one", 1),
            ("two", 2),
            ("three", 3),
            ("four", 4),
            ("five", 5),
            ("six", 6),
            ("seven", 7),
            ("eight", 8),
            ("nine", 9),
            ("ten", 10),
            ("eleven", 11),
            ("twelve", 12),
            ("thirteen", 13),
            ("fourteen", 14),
            ("fifteen", 15),
            ("sixteen", 16),
            ("seventeen", 17),
            ("eighteen", 18),
            ("nineteen", 19),
            ("twenty", 20),
        ] {
            number_words.insert(word, num);
        }

        Self {
            corrections,
            number_words,
        }
    }

    /// Normalize a transcript into one or more canonical readings
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let mut applied_rules = Vec::new();

        let mut current = text.to_string();
        for (re, to) in &self.corrections {
            let replaced = re.replace_all(&current, regex::NoExpand(to)).into_owned();
            if replaced != current {
                applied_rules.push(format!("correction '{}'", re.as_str()));
                current = replaced;
            }
        }

        for rule in RULES {
            let next = (rule.rewrite)(&current);
            if next != current {
                applied_rules.push(rule.name.to_string());
                current = next;
            }
        }

        if current.is_empty() {
            return NormalizedText {
                variants: Vec::new(),
                applied_rules,
            };
        }

        let mut variants: Vec<String> = Vec::new();
        for (name, reading) in alternative_readings(&current) {
            let joined = join_squares(&reading);
            if !variants.contains(&joined) {
                if let Some(name) = name {
                    applied_rules.push(name.to_string());
                }
                variants.push(joined);
            }
        }

        NormalizedText {
            variants,
            applied_rules,
        }
    }

    /// Parse a spoken number (0-20) from text
    pub fn parse_number(&self, text: &str) -> Option<u32> {
        let text_lower = text.trim().to_lowercase();

        if let Ok(num) = text_lower.parse::<u32>() {
            return Some(num);
        }

        self.number_words.get(text_lower.as_str()).copied()
    }
}

fn is_file_letter(token: &str) -> bool {
    token.len() == 1 && matches!(token.as_bytes()[0], b'a'..=b'h')
}

fn is_rank_digit(token: &str) -> bool {
    token.len() == 1 && matches!(token.as_bytes()[0], b'1'..=b'8')
}

fn is_square(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && (b'a'..=b'h').contains(&b[0]) && (b'1'..=b'8').contains(&b[1])
}

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table.iter().find(|(word, _)| *word == token).map(|(_, v)| *v)
}

/// Lowercase; punctuation other than `=`, `+` and `#` becomes a space
pub fn strip_punctuation(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '=' | '+' | '#') {
                c
            } else {
                ' '
            }
        })
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Known recognition confusions and glued move tokens
pub fn phonetic_fixes(text: &str) -> String {
    let mut result = text.to_string();
    for (re, to) in PHONETIC_PHRASES.iter() {
        result = re.replace_all(&result, *to).into_owned();
    }

    result
        .split_whitespace()
        .map(|token| {
            if let Some(letter) = lookup(LETTER_HOMOPHONES, token) {
                return letter.to_string();
            }
            split_glued(token).unwrap_or_else(|| token.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "nf3" -> "N f3", "exd5" -> "e x d5", "e2e4" -> "e2 e4", "e8q" -> "e8 =Q"
fn split_glued(token: &str) -> Option<String> {
    let parts: Vec<String> = if let Some(c) = GLUED_COORDINATE.captures(token) {
        vec![Some(c[1].to_string()), Some(c[2].to_string()), promotion_token(c.get(3))]
            .into_iter()
            .flatten()
            .collect()
    } else if let Some(c) = GLUED_PIECE.captures(token) {
        vec![
            c[1].to_uppercase(),
            c[2].to_string(),
            c[3].to_string(),
            c[4].to_string(),
        ]
    } else if let Some(c) = GLUED_PROMOTION.captures(token) {
        vec![c[1].to_string(), format!("={}", c[2].to_uppercase())]
    } else if let Some(c) = GLUED_PAWN.captures(token) {
        vec![Some(c[1].to_string()), Some(c[2].to_string()), Some(c[3].to_string()), promotion_token(c.get(4))]
            .into_iter()
            .flatten()
            .collect()
    } else {
        return None;
    };

    Some(
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn promotion_token(letter: Option<regex::Match<'_>>) -> Option<String> {
    letter.map(|p| format!("={}", p.as_str().to_uppercase()))
}

/// Number words to digits; rank homophones only after a lone file letter
pub fn number_words(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let after_file = out.last().map_or(false, |prev| is_file_letter(prev));
        let mapped: Option<&str> = lookup(NUMBER_WORDS, token)
            .or_else(|| after_file.then(|| lookup(RANK_HOMOPHONES, token)).flatten());
        out.push(mapped.unwrap_or(token).to_string());
    }
    out.join(" ")
}

/// Piece names to SAN letters; pawn words are dropped
pub fn piece_names(text: &str) -> String {
    text.split_whitespace()
        .filter_map(|token| match lookup(PIECE_WORDS, token) {
            Some("") => None,
            Some(letter) => Some(letter),
            None => Some(token),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Castle phrases to `O-O` / `O-O-O`, queen side tried first
pub fn castling(text: &str) -> String {
    let mut result = text.to_string();
    for (re, to) in CASTLE_PATTERNS.iter() {
        result = re.replace_all(&result, *to).into_owned();
    }
    // A bare "castle" only means king side when no side was named
    if result.contains("O-O") {
        BARE_CASTLE.replace_all(&result, "").into_owned()
    } else {
        BARE_CASTLE.replace_all(&result, "O-O").into_owned()
    }
}

pub fn captures(text: &str) -> String {
    text.split_whitespace()
        .map(|token| if CAPTURE_WORDS.contains(&token) { "x" } else { token })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "promotes to Q" / "equals Q" / "= Q" -> "=Q"
pub fn promotions(text: &str) -> String {
    PROMOTION.replace_all(text, "=$1").into_owned()
}

/// Drop filler words; "a" survives when it names the a-file
pub fn fillers(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let names_file =
            *token == "a" && tokens.get(i + 1).map_or(false, |next| is_rank_digit(next));
        if !FILLER_WORDS.contains(token) || names_file {
            kept.push(*token);
        }
    }
    kept.join(" ")
}

/// Glue a lone file letter and a lone rank digit into a square
pub fn join_squares(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if is_file_letter(tokens[i]) && tokens.get(i + 1).map_or(false, |t| is_rank_digit(t)) {
            out.push(format!("{}{}", tokens[i], tokens[i + 1]));
            i += 2;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

/// The reading as heard, then readings with known ambiguities flipped
fn alternative_readings(text: &str) -> Vec<(Option<&'static str>, String)> {
    let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    let mut readings = vec![(None, text.to_string())];

    // A spoken "8" where a file is expected (before a rank) is usually "h".
    let mut h_reading = tokens.clone();
    let mut changed = false;
    for i in 0..h_reading.len() {
        let prev_is_file = i > 0 && is_file_letter(&h_reading[i - 1]);
        let next_is_rank = h_reading.get(i + 1).map_or(false, |t| is_rank_digit(t));
        if h_reading[i] == "8" && next_is_rank && !prev_is_file {
            h_reading[i] = "h".to_string();
            changed = true;
        }
    }
    if changed {
        readings.push((Some("file_homophone_h"), h_reading.join(" ")));
    }

    // A lone "b" before a square or capture may be the bishop.
    let mut b_reading = tokens;
    let mut changed = false;
    for i in 0..b_reading.len() {
        let next = b_reading.get(i + 1).map(String::as_str);
        let before_target = next.map_or(false, |t| t == "x" || is_square(t) || is_file_letter(t));
        if b_reading[i] == "b" && before_target {
            b_reading[i] = "B".to_string();
            changed = true;
        }
    }
    if changed {
        readings.push((Some("bishop_homophone_b"), b_reading.join(" ")));
    }

    readings
}
