//! Per-session resolver state
//!
//! Owned by the caller and passed to the resolver by `&mut`. At most one of
//! the two wait slots is active: a pending confirmation or an open
//! assistant question.

use crate::core::Suggestion;
use tracing::debug;

/// Which kind of reply the session is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingConfirmation,
    AwaitingAnswer,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Suggestion awaiting yes/no
    pub pending_confirmation: Option<Suggestion>,
    /// An assistant test question is open
    pub awaiting_assistant_answer: bool,
    /// Last phrase spoken to the player, for "repeat"
    pub last_spoken_phrase: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.pending_confirmation.is_some() {
            SessionPhase::AwaitingConfirmation
        } else if self.awaiting_assistant_answer {
            SessionPhase::AwaitingAnswer
        } else {
            SessionPhase::Idle
        }
    }

    /// Start waiting for a yes/no; replaces any open question
    pub fn set_pending(&mut self, suggestion: Suggestion) {
        debug!("Awaiting confirmation of {}", suggestion.uci);
        self.awaiting_assistant_answer = false;
        self.pending_confirmation = Some(suggestion);
    }

    pub fn take_pending(&mut self) -> Option<Suggestion> {
        self.pending_confirmation.take()
    }

    /// Start waiting for a test answer; drops any pending confirmation
    pub fn await_answer(&mut self) {
        self.pending_confirmation = None;
        self.awaiting_assistant_answer = true;
    }

    pub fn clear_answer(&mut self) {
        self.awaiting_assistant_answer = false;
    }

    /// Back to idle, keeping the last spoken phrase
    pub fn reset(&mut self) {
        self.pending_confirmation = None;
        self.awaiting_assistant_answer = false;
    }
}
