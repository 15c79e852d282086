//! Confirmation handling
//!
//! While a suggestion is pending, an utterance is read only as yes or no.
//! The last recognized token wins ("no wait, yes" is a yes).

use crate::core::Suggestion;
use crate::session::SessionState;
use tracing::{debug, info};

const YES_WORDS: &[&str] = &[
    "y", "yes", "yeah", "yep", "yup", "correct", "right", "ok", "okay", "sure", "affirmative",
];

const NO_WORDS: &[&str] = &["n", "no", "nope", "negative", "incorrect", "wrong", "nah"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

/// Result of feeding an utterance to a pending confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationResult {
    /// The player accepted; pending cleared
    Accepted(Suggestion),
    /// The player declined; pending cleared
    Declined,
    /// Neither yes nor no; pending untouched
    Unclear(Suggestion),
}

/// Read a transcript as yes or no
pub fn parse_yes_no(text: &str) -> Option<YesNo> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|token| {
            if YES_WORDS.contains(&token) {
                Some(YesNo::Yes)
            } else if NO_WORDS.contains(&token) {
                Some(YesNo::No)
            } else {
                None
            }
        })
        .last()
}

/// Apply a transcript to the pending confirmation, if there is one
pub fn handle_confirmation(text: &str, session: &mut SessionState) -> Option<ConfirmationResult> {
    let result = match parse_yes_no(text) {
        Some(YesNo::Yes) => {
            let accepted = session.take_pending()?;
            info!("✅ Confirmed: {}", accepted.phrase);
            ConfirmationResult::Accepted(accepted)
        }
        Some(YesNo::No) => {
            session.take_pending()?;
            info!("❌ Suggestion declined");
            ConfirmationResult::Declined
        }
        None => {
            let pending = session.pending_confirmation.clone()?;
            debug!("Confirmation unclear: '{}'", text);
            ConfirmationResult::Unclear(pending)
        }
    };

    Some(result)
}
