//! Integration tests for prompt coaching
//!
//! Heuristic layers, history updates and the eligibility gate together

use hugo_resonance::config::{CoachingSettings, ScoringConfig};
use hugo_resonance::core::{CoachingGate, GateRefusal, PromptCoach, ScoringSession};
use hugo_resonance::types::{CoachingState, PromptHistory};
use hugo_resonance::COACH_CONFIDENCE_CAP;

fn session() -> ScoringSession {
    ScoringSession::new("coach", ScoringConfig::default()).unwrap()
}

#[test]
fn test_shouting_prompt_is_urgent() {
    let coach = PromptCoach::new();
    let analysis = coach.analyze("I NEED THIS ASAP!!!", &PromptHistory::new());

    assert_eq!(analysis.state, CoachingState::Urgency);
    assert!(analysis.should_coach);
    // both layers agree
    assert_eq!(analysis.keyword.state, CoachingState::Urgency);
    assert_eq!(analysis.syntax.state, CoachingState::Urgency);
    assert!(analysis.reason.starts_with("keyword layer"));
}

#[test]
fn test_state_per_keyword_family() {
    let coach = PromptCoach::new();
    let history = PromptHistory::new();
    let cases = [
        ("This is broken and nothing works, I've tried everything!", CoachingState::Frustration),
        ("I don't understand what do you mean??", CoachingState::Confusion),
        ("Could you please explain closures step by step, with an example?", CoachingState::Clarity),
        ("hello there", CoachingState::Neutral),
    ];
    for (text, expected) in cases {
        assert_eq!(coach.analyze(text, &history).state, expected, "prompt: {}", text);
    }
}

#[test]
fn test_neutral_prompt_not_coached() {
    let analysis = PromptCoach::new().analyze("hello there", &PromptHistory::new());
    assert_eq!(analysis.confidence, 0.55);
    assert!(!analysis.should_coach);
}

#[test]
fn test_empty_prompt_is_neutral_zero() {
    let analysis = PromptCoach::new().analyze("   ", &PromptHistory::new());
    assert_eq!(analysis.state, CoachingState::Neutral);
    assert_eq!(analysis.confidence, 0.0);
    assert!(!analysis.should_coach);
}

#[test]
fn test_short_prompt_shift_boosts_confidence() {
    let mut history = PromptHistory::new();
    history.record(20, CoachingState::Clarity, 0);

    let analysis = PromptCoach::new().analyze("hello there", &history);
    assert!(analysis.pattern.short_prompt);
    assert!(analysis.pattern.shift_detected);
    assert!((analysis.confidence - 0.67).abs() < 1e-9);
    assert!(analysis.should_coach);
    assert!(analysis.reason.contains("much shorter than usual"));
}

#[test]
fn test_confidence_capped() {
    let mut history = PromptHistory::new();
    for t in [0, 1_000, 2_000] {
        history.record(40, CoachingState::Neutral, t);
    }
    assert!(history.rapid_fire);

    let analysis = PromptCoach::new().analyze("broken again, tried everything", &history);
    assert_eq!(analysis.state, CoachingState::Frustration);
    assert_eq!(analysis.confidence, COACH_CONFIDENCE_CAP);
    assert!(analysis.pattern.rapid_fire);
}

#[test]
fn test_rapid_fire_detected_through_session() {
    let mut s = session();
    s.analyze_prompt("first question about lifetimes", 0);
    s.analyze_prompt("second question about lifetimes", 5_000);
    assert!(!s.history().rapid_fire);

    s.analyze_prompt("third question about lifetimes", 10_000);
    assert!(s.history().rapid_fire);

    // window has moved past all three
    s.analyze_prompt("a much later question", 100_000);
    assert!(!s.history().rapid_fire);
    assert_eq!(s.history().sends_in_window(), 1);
}

#[test]
fn test_gate_blocks_within_min_interval() {
    let mut gate = CoachingGate::new(CoachingSettings::default());
    gate.mark_coached(100_000);

    assert_eq!(gate.check(100_000 + 10_000), Err(GateRefusal::TooSoon));
    assert!(!gate.can_coach(100_000 + 44_999));
    assert!(gate.can_coach(100_000 + 45_000));
}

#[test]
fn test_gate_snooze_after_dismiss() {
    let mut gate = CoachingGate::new(CoachingSettings::default());
    gate.dismiss(0);

    assert_eq!(gate.check(60 * 60_000 - 1), Err(GateRefusal::Snoozed));
    assert_eq!(gate.check(60 * 60_000), Ok(()));
}

#[test]
fn test_gate_disabled() {
    let mut gate = CoachingGate::new(CoachingSettings::default());
    gate.set_enabled(false);
    assert_eq!(gate.check(0), Err(GateRefusal::Disabled));
}

/// Confidence alone never overrides the gate
#[test]
fn test_high_confidence_still_rate_limited() {
    let mut s = session();
    let first = s.analyze_prompt("I NEED THIS ASAP!!!", 0);
    assert!(first.show);

    let second = s.analyze_prompt("This is broken and nothing works, I've tried everything!", 30_000);
    assert!(second.confidence >= 0.6);
    assert!(!second.show);

    let third = s.analyze_prompt("This is broken and nothing works, I've tried everything!", 60_000);
    assert!(third.show);
}

#[test]
fn test_coaching_output_carries_display_tables() {
    let mut s = session();
    let out = s.analyze_prompt("I NEED THIS ASAP!!!", 0);
    assert_eq!(out.visuals, CoachingState::Urgency.visuals());
    assert_eq!(out.script, CoachingState::Urgency.script());

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["state"], "URGENCY");
    assert!(json["script"]["suggestions"].is_array());
    assert!(json["visuals"]["icon"].is_string());
}
