//! Command classification
//!
//! Reserved assistant words are recognized before any move parsing. Matching
//! is per token, so "undone" or "contest" never fire a command.

use crate::session::SessionState;
use chess::Color;
use tracing::debug;

/// What a test question should be about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestTopic {
    Checks,
    Captures,
    Where,
    What,
}

impl TestTopic {
    pub const ALL: [TestTopic; 4] = [
        TestTopic::Checks,
        TestTopic::Captures,
        TestTopic::Where,
        TestTopic::What,
    ];
}

/// A request for a test question; unset fields are chosen by the assistant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestRequest {
    pub color: Option<Color>,
    pub topic: Option<TestTopic>,
}

/// A reserved assistant command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Take back the last move
    Undo,
    /// Say the last phrase again; `None` when nothing was said yet
    Repeat(Option<String>),
    /// Read out the moves so far
    Recap,
    /// Ask a test question
    Test(TestRequest),
    /// The reply to an open test question
    Answer(String),
}

fn tokens(transcript: &str) -> Vec<String> {
    transcript
        .trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn has(tokens: &[String], word: &str) -> bool {
    tokens.iter().any(|t| t == word)
}

fn has_pair(tokens: &[String], first: &str, second: &str) -> bool {
    tokens.windows(2).any(|w| w[0] == first && w[1] == second)
}

fn is_undo(tokens: &[String]) -> bool {
    has(tokens, "undo") || has(tokens, "takeback") || has_pair(tokens, "take", "back")
}

/// Topic and color qualifiers of a test request
fn test_request(tokens: &[String]) -> TestRequest {
    let topic = if has(tokens, "check") || has(tokens, "checks") {
        Some(TestTopic::Checks)
    } else if has(tokens, "capture") || has(tokens, "captures") {
        Some(TestTopic::Captures)
    } else if has(tokens, "where") {
        Some(TestTopic::Where)
    } else if has(tokens, "what") {
        Some(TestTopic::What)
    } else {
        None
    };

    let color = if has(tokens, "white") {
        Some(Color::White)
    } else if has(tokens, "black") {
        Some(Color::Black)
    } else {
        None
    };

    TestRequest { color, topic }
}

/// Classify a transcript as a reserved command, in priority order
///
/// Undo, repeat, recap, test. While an answer to a test question is
/// awaited, "other" asks for a new question as well.
pub fn classify(transcript: &str, session: &SessionState) -> Option<CommandKind> {
    let tokens = tokens(transcript);
    if tokens.is_empty() {
        return None;
    }

    let command = if is_undo(&tokens) {
        CommandKind::Undo
    } else if has(&tokens, "repeat") {
        CommandKind::Repeat(session.last_spoken_phrase.clone())
    } else if has(&tokens, "recap") {
        CommandKind::Recap
    } else if has(&tokens, "test")
        || (session.awaiting_assistant_answer && has(&tokens, "other"))
    {
        CommandKind::Test(test_request(&tokens))
    } else {
        return None;
    };

    debug!("Command classified: {:?}", command);
    Some(command)
}
