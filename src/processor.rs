//! Voice Resolver
//!
//! Entry point of the core: turns one transcript into exactly one
//! [`ResolutionResult`] for a given position and session.
//!
//! **Routing order:**
//! 1. Empty transcript → `Unresolved(NoInput)`, rules engine untouched
//! 2. Reserved commands (undo wins over everything)
//! 3. Pending confirmation → yes/no only
//! 4. Open assistant question → the transcript is the answer
//! 5. Normalizer → candidates → legality matcher
//! 6. Implicit destination resolver
//! 7. Similarity suggester

use crate::commands::{classify, CommandKind};
use crate::config::Config;
use crate::confirmation::{handle_confirmation, ConfirmationResult};
use crate::core::{
    generate_candidates, humanize, match_candidates, resolve_implicit, suggest, CandidateAttempt,
    ImplicitOutcome, SuggestOutcome, Suggestion, TextNormalizer,
};
use crate::error::VoiceResult;
use crate::rules::{create_engine, Position, RulesEngine};
use crate::session::SessionState;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Why the player is being asked again
#[derive(Debug, Clone, PartialEq)]
pub enum Reprompt {
    /// Nothing was heard
    NoInput,
    /// Heard something, but no move came of it
    TryAgain,
    /// The suggestion was declined
    Declined,
    /// A suggestion is still waiting for yes or no
    ConfirmAgain(Suggestion),
}

impl Reprompt {
    pub fn prompt(&self) -> String {
        match self {
            Reprompt::NoInput => "I didn't hear anything. Please say your move.".to_string(),
            Reprompt::TryAgain => "I didn't understand that move. Please try again.".to_string(),
            Reprompt::Declined => "Okay. Please say your move again.".to_string(),
            Reprompt::ConfirmAgain(s) => {
                format!("Please say yes or no. Did you mean {}?", s.phrase)
            }
        }
    }
}

/// Outcome of resolving one transcript
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    /// A legal move, in UCI
    Matched(String),
    /// A best guess; the session now awaits yes/no
    Suggested(Suggestion),
    Command(CommandKind),
    Unresolved(Reprompt),
}

impl ResolutionResult {
    /// One-line description for traces and logs
    pub fn summary(&self) -> String {
        match self {
            ResolutionResult::Matched(uci) => format!("matched {}", uci),
            ResolutionResult::Suggested(s) => format!("suggested {} ({:.2})", s.uci, s.score),
            ResolutionResult::Command(cmd) => format!("command {:?}", cmd),
            ResolutionResult::Unresolved(r) => format!("unresolved {:?}", r),
        }
    }
}

/// The pipeline stage that produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NoInput,
    Command,
    Confirmation,
    AssistantAnswer,
    Matcher,
    Implicit,
    Suggester,
    Unresolved,
}

/// Diagnostics for one resolution call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionTrace {
    pub transcript: String,
    pub variants: Vec<String>,
    pub applied_rules: Vec<String>,
    pub attempts: Vec<CandidateAttempt>,
    pub implicit: Option<ImplicitOutcome>,
    pub suggestion_score: Option<f64>,
    pub stage: Stage,
    pub result: String,
}

impl ResolutionTrace {
    fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            variants: Vec::new(),
            applied_rules: Vec::new(),
            attempts: Vec::new(),
            implicit: None,
            suggestion_score: None,
            stage: Stage::Unresolved,
            result: String::new(),
        }
    }

    fn finish(mut self, stage: Stage, result: ResolutionResult) -> (ResolutionResult, ResolutionTrace) {
        self.stage = stage;
        self.result = result.summary();
        (result, self)
    }
}

/// Resolves spoken transcripts into moves or commands
pub struct VoiceResolver {
    rules: Box<dyn RulesEngine>,
    normalizer: TextNormalizer,
}

impl VoiceResolver {
    pub fn new(rules: Box<dyn RulesEngine>) -> Self {
        Self::with_corrections(rules, HashMap::new())
    }

    /// Resolver with configured phrase corrections applied before normalizing
    pub fn with_corrections(
        rules: Box<dyn RulesEngine>,
        corrections: HashMap<String, String>,
    ) -> Self {
        Self {
            rules,
            normalizer: TextNormalizer::new(corrections),
        }
    }

    /// Build from configuration; an unknown rules engine is an error
    pub fn from_config(config: &Config) -> VoiceResult<Self> {
        let rules = create_engine(config)?;
        info!("♟️ Rules engine: {}", rules.name());
        Ok(Self::with_corrections(
            rules,
            config.voice_corrections.clone(),
        ))
    }

    pub fn rules(&self) -> &dyn RulesEngine {
        self.rules.as_ref()
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Resolve a transcript; see the module docs for the routing order
    pub fn resolve(
        &self,
        transcript: &str,
        position: &Position,
        session: &mut SessionState,
    ) -> ResolutionResult {
        self.resolve_traced(transcript, position, session).0
    }

    /// Resolve and report how the result was reached
    pub fn resolve_traced(
        &self,
        transcript: &str,
        position: &Position,
        session: &mut SessionState,
    ) -> (ResolutionResult, ResolutionTrace) {
        let trace = ResolutionTrace::new(transcript);

        if transcript.trim().is_empty() {
            return trace.finish(Stage::NoInput, ResolutionResult::Unresolved(Reprompt::NoInput));
        }

        if let Some(command) = classify(transcript, session) {
            if command == CommandKind::Undo {
                session.reset();
            }
            return trace.finish(Stage::Command, ResolutionResult::Command(command));
        }

        if let Some(confirmation) = handle_confirmation(transcript, session) {
            let result = match confirmation {
                ConfirmationResult::Accepted(s) => ResolutionResult::Matched(s.uci),
                ConfirmationResult::Declined => ResolutionResult::Unresolved(Reprompt::Declined),
                ConfirmationResult::Unclear(s) => {
                    ResolutionResult::Unresolved(Reprompt::ConfirmAgain(s))
                }
            };
            return trace.finish(Stage::Confirmation, result);
        }

        if session.awaiting_assistant_answer {
            session.clear_answer();
            let answer = transcript.trim().to_string();
            return trace.finish(
                Stage::AssistantAnswer,
                ResolutionResult::Command(CommandKind::Answer(answer)),
            );
        }

        self.resolve_move(transcript, position, session, trace)
    }

    fn resolve_move(
        &self,
        transcript: &str,
        position: &Position,
        session: &mut SessionState,
        mut trace: ResolutionTrace,
    ) -> (ResolutionResult, ResolutionTrace) {
        let normalized = self.normalizer.normalize(transcript);
        debug!(
            "Normalized '{}' -> '{}' ({} reading(s))",
            transcript,
            normalized.primary(),
            normalized.variants.len()
        );
        trace.variants = normalized.variants.clone();
        trace.applied_rules = normalized.applied_rules.clone();

        let candidates = generate_candidates(&normalized.variants);
        let (hit, attempts) = match_candidates(self.rules(), position, &candidates);
        trace.attempts = attempts;
        if let Some(mv) = hit {
            return trace.finish(Stage::Matcher, ResolutionResult::Matched(mv.uci));
        }

        let legal = self.rules.legal_moves(position);

        let implicit = resolve_implicit(&normalized.variants, &legal);
        trace.implicit = Some(implicit.clone());
        if let ImplicitOutcome::Unique { uci } = implicit {
            return trace.finish(Stage::Implicit, ResolutionResult::Matched(uci));
        }

        let outcome = suggest(transcript, &legal);
        trace.suggestion_score = outcome.best_score();
        match outcome {
            SuggestOutcome::Suggested(suggestion) => {
                session.set_pending(suggestion.clone());
                trace.finish(Stage::Suggester, ResolutionResult::Suggested(suggestion))
            }
            _ => trace.finish(
                Stage::Unresolved,
                ResolutionResult::Unresolved(Reprompt::TryAgain),
            ),
        }
    }

    /// Spoken phrase for a move given as UCI or SAN
    pub fn humanize(&self, position: Option<&Position>, move_text: &str) -> String {
        humanize(self.rules(), position, move_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StandardRules;
    use crate::session::SessionPhase;

    fn resolver() -> VoiceResolver {
        VoiceResolver::new(Box::new(StandardRules::new()))
    }

    fn resolve_idle(text: &str, position: &Position) -> ResolutionResult {
        resolver().resolve(text, position, &mut SessionState::new())
    }

    #[test]
    fn test_spoken_coordinates() {
        assert_eq!(
            resolve_idle("e two e four", &Position::starting()),
            ResolutionResult::Matched("e2e4".to_string())
        );
    }

    #[test]
    fn test_spoken_piece_move() {
        assert_eq!(
            resolve_idle("knight f three", &Position::starting()),
            ResolutionResult::Matched("g1f3".to_string())
        );
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(
            resolve_idle("   ", &Position::starting()),
            ResolutionResult::Unresolved(Reprompt::NoInput)
        );
    }

    #[test]
    fn test_undo_while_confirming() {
        let resolver = resolver();
        let mut session = SessionState::new();
        session.set_pending(Suggestion {
            uci: "g1f3".to_string(),
            san: "Nf3".to_string(),
            phrase: "knight f3".to_string(),
            score: 0.6,
        });
        assert_eq!(
            resolver.resolve("undo", &Position::starting(), &mut session),
            ResolutionResult::Command(CommandKind::Undo)
        );
    }

    #[test]
    fn test_answer_while_awaiting() {
        let resolver = resolver();
        let mut session = SessionState::new();
        session.await_answer();
        assert_eq!(
            resolver.resolve(" three ", &Position::starting(), &mut session),
            ResolutionResult::Command(CommandKind::Answer("three".to_string()))
        );
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_alternate_reading_in_trace() {
        let resolver = resolver();
        let position = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 0 1",
        )
        .unwrap();
        let (result, trace) =
            resolver.resolve_traced("knight eight four", &position, &mut SessionState::new());
        assert_eq!(result, ResolutionResult::Matched("f3h4".to_string()));
        assert_eq!(trace.variants, vec!["N 8 4".to_string(), "N h4".to_string()]);
        // "Nh4" is legal, so the matcher settles it from the second reading
        assert_eq!(trace.stage, Stage::Matcher);
        assert_eq!(trace.attempts.last().map(|a| a.variant), Some(1));
    }

    #[test]
    fn test_trace_serializes() {
        let (_, trace) = resolver().resolve_traced(
            "takes d5",
            &Position::from_fen("rnbqkbnr/ppp1ppp1/7p/3p4/2P1P3/8/PP1P1PPP/RNBQKBNR w KQkq - 0 3")
                .unwrap(),
            &mut SessionState::new(),
        );
        assert_eq!(trace.stage, Stage::Unresolved);
        assert_eq!(trace.implicit, Some(ImplicitOutcome::Ambiguous { count: 2 }));
        let json = serde_json::to_string(&trace).expect("trace serializes");
        assert!(json.contains("\"stage\":\"unresolved\""));
        assert!(json.contains("\"kind\":\"ambiguous\""));
    }

    #[test]
    fn test_humanize_delegates() {
        assert_eq!(
            resolver().humanize(Some(&Position::starting()), "b1c3"),
            "knight c3"
        );
        assert_eq!(resolver().humanize(None, "b1c3"), "b1 to c3");
    }
}
