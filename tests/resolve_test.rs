use chessvoice::commands::CommandKind;
use chessvoice::config::Config;
use chessvoice::core::Suggestion;
use chessvoice::processor::Stage;
use chessvoice::rules::RulesEngine;
use chessvoice::session::SessionPhase;
use chessvoice::{Position, Reprompt, ResolutionResult, SessionState, VoiceResolver};
use std::sync::atomic::Ordering;

mod common;
use common::mock_rules::MockRules;
use common::{position, standard_resolver, BOTH_CASTLES, ITALIAN, TWO_PAWNS_ON_D5};

/// Exactly 9/20 similar to "castle queen side"
const AT_THRESHOLD: &str = "castle quzzzzzzzzzzz";
/// Exactly 11/25 similar to "castle queen side"
const BELOW_THRESHOLD: &str = "castle queezzzzzzzzzzzzzz";

fn mock_resolver() -> VoiceResolver {
    VoiceResolver::new(Box::new(MockRules::queen_side_castle_only()))
}

fn suggested_session(resolver: &VoiceResolver) -> (SessionState, Suggestion) {
    let mut session = SessionState::new();
    match resolver.resolve(AT_THRESHOLD, &Position::starting(), &mut session) {
        ResolutionResult::Suggested(s) => (session, s),
        other => panic!("Expected a suggestion, got {:?}", other),
    }
}

#[test]
fn test_spoken_coordinates_resolve() {
    let resolver = standard_resolver();
    let mut session = SessionState::new();
    assert_eq!(
        resolver.resolve("e two e four", &Position::starting(), &mut session),
        ResolutionResult::Matched("e2e4".to_string())
    );
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_spoken_knight_move_resolves() {
    let resolver = standard_resolver();
    assert_eq!(
        resolver.resolve("knight f three", &Position::starting(), &mut SessionState::new()),
        ResolutionResult::Matched("g1f3".to_string())
    );
}

#[test]
fn test_humanized_moves_round_trip() {
    let resolver = standard_resolver();

    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ITALIAN,
    ] {
        let pos = position(fen);
        for mv in resolver.rules().legal_moves(&pos) {
            let phrase = resolver.humanize(Some(&pos), &mv.san);
            assert_eq!(
                resolver.resolve(&phrase, &pos, &mut SessionState::new()),
                ResolutionResult::Matched(mv.uci.clone()),
                "'{}' ({}) did not round-trip in {}",
                phrase,
                mv.san,
                fen
            );
        }
    }
}

#[test]
fn test_castle_phrases() {
    let resolver = standard_resolver();
    let pos = position(ITALIAN);
    for phrase in ["castle king side", "castles short", "O-O", "oh oh", "castle"] {
        assert_eq!(
            resolver.resolve(phrase, &pos, &mut SessionState::new()),
            ResolutionResult::Matched("e1g1".to_string()),
            "{}",
            phrase
        );
    }
}

#[test]
fn test_castle_sides_with_fillers() {
    let resolver = standard_resolver();
    let pos = position(BOTH_CASTLES);
    let cases = [
        ("castle queen side", "e1c1"),
        ("long castle", "e1c1"),
        ("castle on the queen side", "e1c1"),
        ("castle to the queen side", "e1c1"),
        ("castles queenside please", "e1c1"),
        ("castle on the king side", "e1g1"),
        ("castle short", "e1g1"),
        ("castle", "e1g1"),
    ];
    for (phrase, uci) in cases {
        assert_eq!(
            resolver.resolve(phrase, &pos, &mut SessionState::new()),
            ResolutionResult::Matched(uci.to_string()),
            "{}",
            phrase
        );
    }
}

#[test]
fn test_undo_wins_over_pending_confirmation() {
    let resolver = mock_resolver();
    let (mut session, _) = suggested_session(&resolver);
    assert_eq!(
        resolver.resolve("undo", &Position::starting(), &mut session),
        ResolutionResult::Command(CommandKind::Undo)
    );
}

#[test]
fn test_threshold_is_inclusive() {
    let resolver = mock_resolver();
    let (session, suggestion) = suggested_session(&resolver);
    assert_eq!(suggestion.uci, "e1c1");
    assert_eq!(suggestion.phrase, "castle queen side");
    assert!((suggestion.score - 0.45).abs() < 1e-9);
    assert_eq!(session.pending_confirmation, Some(suggestion));
}

#[test]
fn test_below_threshold_is_unresolved() {
    let resolver = mock_resolver();
    let mut session = SessionState::new();
    let (result, trace) =
        resolver.resolve_traced(BELOW_THRESHOLD, &Position::starting(), &mut session);
    assert_eq!(result, ResolutionResult::Unresolved(Reprompt::TryAgain));
    assert_eq!(session.phase(), SessionPhase::Idle);
    let score = trace.suggestion_score.expect("scored");
    assert!((score - 0.44).abs() < 1e-9);
}

#[test]
fn test_confirmation_yes() {
    let resolver = mock_resolver();
    let (mut session, suggestion) = suggested_session(&resolver);
    assert_eq!(
        resolver.resolve("yes", &Position::starting(), &mut session),
        ResolutionResult::Matched(suggestion.uci)
    );
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_confirmation_no() {
    let resolver = mock_resolver();
    let (mut session, _) = suggested_session(&resolver);
    assert_eq!(
        resolver.resolve("no", &Position::starting(), &mut session),
        ResolutionResult::Unresolved(Reprompt::Declined)
    );
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_confirmation_unrecognized() {
    let resolver = mock_resolver();
    let (mut session, suggestion) = suggested_session(&resolver);
    let before = session.clone();
    let result = resolver.resolve("maybe", &Position::starting(), &mut session);
    assert_eq!(
        result,
        ResolutionResult::Unresolved(Reprompt::ConfirmAgain(suggestion))
    );
    assert_eq!(session, before);
}

#[test]
fn test_pending_confirmation_ignores_moves() {
    let resolver = mock_resolver();
    let (mut session, _) = suggested_session(&resolver);
    let (result, trace) = resolver.resolve_traced("e1c1", &Position::starting(), &mut session);
    assert!(matches!(
        result,
        ResolutionResult::Unresolved(Reprompt::ConfirmAgain(_))
    ));
    assert_eq!(trace.stage, Stage::Confirmation);
}

#[test]
fn test_two_pawn_capture_is_never_guessed() {
    let resolver = standard_resolver();
    let pos = position(TWO_PAWNS_ON_D5);
    for phrase in ["takes d5", "pawn takes d5", "pawn captures d five"] {
        let mut session = SessionState::new();
        assert_eq!(
            resolver.resolve(phrase, &pos, &mut session),
            ResolutionResult::Unresolved(Reprompt::TryAgain),
            "{}",
            phrase
        );
        assert!(session.pending_confirmation.is_none());
    }

    // Naming the file settles it
    assert_eq!(
        resolver.resolve("c takes d5", &pos, &mut SessionState::new()),
        ResolutionResult::Matched("c4d5".to_string())
    );
}

#[test]
fn test_empty_transcript_skips_rules_engine() {
    let rules = MockRules::queen_side_castle_only();
    let queries = rules.queries.clone();
    let resolver = VoiceResolver::new(Box::new(rules));

    for text in ["", "   ", "\t\n"] {
        assert_eq!(
            resolver.resolve(text, &Position::starting(), &mut SessionState::new()),
            ResolutionResult::Unresolved(Reprompt::NoInput)
        );
    }
    assert_eq!(queries.load(Ordering::SeqCst), 0);
}

#[test]
fn test_config_corrections_and_engine() {
    let mut config = Config::default();
    config
        .voice_corrections
        .insert("nay".to_string(), "knight".to_string());
    let resolver = VoiceResolver::from_config(&config).expect("standard engine");
    assert_eq!(
        resolver.resolve("nay f three", &Position::starting(), &mut SessionState::new()),
        ResolutionResult::Matched("g1f3".to_string())
    );

    config.rules_engine = "unknown".to_string();
    assert!(VoiceResolver::from_config(&config).is_err());
}

#[test]
fn test_resolve_does_not_touch_position() {
    let resolver = standard_resolver();
    let pos = position(ITALIAN);
    let copy = pos;
    resolver.resolve("castle king side", &pos, &mut SessionState::new());
    assert_eq!(pos, copy);
}
