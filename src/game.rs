//! Game session
//!
//! Owns the mutable game: the position, the move history and the resolver
//! session. The resolver only reports what was said; moves are applied,
//! taken back and answered here.

use crate::assistant::{self, TestQuestion};
use crate::audit::AuditLog;
use crate::commands::CommandKind;
use crate::core::phrase_for_san;
use crate::error::{VoiceError, VoiceResult};
use crate::processor::{ResolutionResult, VoiceResolver};
use crate::rules::{color_name, Position, RulesEngine};
use crate::session::SessionState;
use chess::{BoardStatus, Color};
use rand::Rng;
use tracing::{info, warn};

/// A move that was applied to the game
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedMove {
    pub uci: String,
    pub san: String,
    pub phrase: String,
    pub color: Color,
    /// Position the move was played from, restored by undo
    pub before: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

impl From<BoardStatus> for GameStatus {
    fn from(status: BoardStatus) -> Self {
        match status {
            BoardStatus::Ongoing => GameStatus::Ongoing,
            BoardStatus::Checkmate => GameStatus::Checkmate,
            BoardStatus::Stalemate => GameStatus::Stalemate,
        }
    }
}

/// What the session says back after an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Played {
        played: PlayedMove,
        status: GameStatus,
    },
    Undone(PlayedMove),
    Speak(String),
}

impl Reply {
    pub fn text(&self) -> String {
        match self {
            Reply::Played { played, status } => {
                let mut text = format!("{}.", capitalize(&played.phrase));
                match status {
                    GameStatus::Checkmate => text.push_str(" Checkmate!"),
                    GameStatus::Stalemate => text.push_str(" Stalemate."),
                    GameStatus::Ongoing if played.san.ends_with('+') => text.push_str(" Check."),
                    GameStatus::Ongoing => {}
                }
                text
            }
            Reply::Undone(played) => format!("Took back {}.", played.phrase),
            Reply::Speak(text) => text.clone(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One player's voice-driven game
pub struct GameSession {
    pub position: Position,
    pub history: Vec<PlayedMove>,
    pub session: SessionState,
    /// The side the player moves; `None` for both sides
    pub player_color: Option<Color>,
    question: Option<TestQuestion>,
    audit: Option<AuditLog>,
}

impl GameSession {
    pub fn new(position: Position, player_color: Option<Color>) -> Self {
        Self {
            position,
            history: Vec::new(),
            session: SessionState::new(),
            player_color,
            question: None,
            audit: None,
        }
    }

    /// Record every resolution trace to `audit`
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn status(&self) -> GameStatus {
        self.position.status().into()
    }

    pub fn is_players_turn(&self) -> bool {
        self.player_color
            .map_or(true, |color| color == self.position.side_to_move())
    }

    pub fn open_question(&self) -> Option<&TestQuestion> {
        self.question.as_ref()
    }

    /// Apply a move given as UCI (SAN is accepted too) after validating it
    pub fn apply_uci(&mut self, rules: &dyn RulesEngine, text: &str) -> VoiceResult<PlayedMove> {
        let mv = rules
            .parse_and_validate(&self.position, text.trim(), false)
            .ok_or_else(|| VoiceError::IllegalMove(text.to_string()))?;

        let played = PlayedMove {
            uci: mv.uci.clone(),
            san: mv.san.clone(),
            phrase: phrase_for_san(&mv.san).unwrap_or_else(|| mv.san.clone()),
            color: self.position.side_to_move(),
            before: self.position,
        };

        self.position = self.position.after(&mv);
        self.history.push(played.clone());
        self.session.reset();
        self.question = None;
        info!("♟️ {} played {}", color_name(played.color), played.san);
        Ok(played)
    }

    /// Take back one ply
    pub fn undo(&mut self) -> Option<PlayedMove> {
        let played = self.history.pop()?;
        self.position = played.before;
        self.session.reset();
        self.question = None;
        info!("↩️ Took back {}", played.san);
        Some(played)
    }

    /// Resolve one transcript and act on it
    pub fn handle_utterance<R: Rng + ?Sized>(
        &mut self,
        resolver: &VoiceResolver,
        transcript: &str,
        rng: &mut R,
    ) -> Reply {
        let (result, trace) = resolver.resolve_traced(transcript, &self.position, &mut self.session);

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record(&trace) {
                warn!("⚠️ Could not write audit log: {}", e);
            }
        }

        let repeat = matches!(result, ResolutionResult::Command(CommandKind::Repeat(_)));
        let reply = self.dispatch(resolver, result, rng);
        if !repeat {
            self.session.last_spoken_phrase = Some(reply.text());
        }
        reply
    }

    fn dispatch<R: Rng + ?Sized>(
        &mut self,
        resolver: &VoiceResolver,
        result: ResolutionResult,
        rng: &mut R,
    ) -> Reply {
        match result {
            ResolutionResult::Matched(_) | ResolutionResult::Suggested(_)
                if !self.is_players_turn() =>
            {
                self.session.reset();
                Reply::Speak(format!(
                    "It is {}'s turn, not yours.",
                    color_name(self.position.side_to_move())
                ))
            }
            ResolutionResult::Matched(uci) => match self.apply_uci(resolver.rules(), &uci) {
                Ok(played) => Reply::Played {
                    played,
                    status: self.status(),
                },
                Err(e) => {
                    warn!("❌ Could not apply {}: {}", uci, e);
                    Reply::Speak("That move is not legal here.".to_string())
                }
            },
            ResolutionResult::Suggested(suggestion) => Reply::Speak(suggestion.prompt()),
            ResolutionResult::Unresolved(reprompt) => Reply::Speak(reprompt.prompt()),
            ResolutionResult::Command(command) => self.run_command(resolver, command, rng),
        }
    }

    fn run_command<R: Rng + ?Sized>(
        &mut self,
        resolver: &VoiceResolver,
        command: CommandKind,
        rng: &mut R,
    ) -> Reply {
        match command {
            CommandKind::Undo => match self.undo() {
                Some(played) => Reply::Undone(played),
                None => Reply::Speak("There is nothing to undo.".to_string()),
            },
            CommandKind::Repeat(Some(phrase)) => Reply::Speak(phrase),
            CommandKind::Repeat(None) => Reply::Speak("There is nothing to repeat yet.".to_string()),
            CommandKind::Recap => Reply::Speak(assistant::recap(&self.history)),
            CommandKind::Test(request) => {
                let question =
                    assistant::test_question(&self.position, resolver.rules(), &request, rng);
                let prompt = question.prompt.clone();
                self.question = Some(question);
                self.session.await_answer();
                Reply::Speak(prompt)
            }
            CommandKind::Answer(answer) => match self.question.take() {
                Some(question) => {
                    if assistant::grade(&question, &answer, resolver.normalizer()) {
                        Reply::Speak(format!("Correct! {}", question.answer))
                    } else {
                        Reply::Speak(format!("Not quite. The answer is {}", question.answer))
                    }
                }
                None => Reply::Speak("There is no open question.".to_string()),
            },
        }
    }
}
