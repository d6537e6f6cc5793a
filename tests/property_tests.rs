use hugo_resonance::config::DriftConfig;
use hugo_resonance::core::{normalize, DriftSmoother, LexiconTable, PromptCoach, ResonanceScorer};
use hugo_resonance::types::PromptHistory;
use hugo_resonance::{COACH_CONFIDENCE_CAP, DRIFT_CAPACITY};
use proptest::prelude::*;
use serde_json::json;

// --- STRATEGIES ---

// Mix of lexicon words, noise, emoji and control chars
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[a-zA-Z !?.,]{0,300}",
        prop::collection::vec(
            prop::sample::select(vec![
                "urgent", "broken", "perfect", "perhaps", "calm", "ASAP", "!!!", "??",
                "thanks", "\u{0}", "🔥", "nothing works", "   ", "\n",
            ]),
            0..40
        )
        .prop_map(|words| words.join(" ")),
    ]
}

prop_compose! {
    fn arb_drift_config()(
        capacity in 1usize..20,
        decay in 0.05..=1.0f64
    ) -> DriftConfig {
        DriftConfig { capacity, decay }
    }
}

proptest! {
    #[test]
    fn test_hri_always_bounded(text in arb_text()) {
        let reading = ResonanceScorer::default().evaluate(&text);
        prop_assert!((0.0..=1.0).contains(&reading.hri), "hri {} for {:?}", reading.hri, text);
    }

    #[test]
    fn test_scoring_deterministic(text in arb_text()) {
        let scorer = ResonanceScorer::default();
        let table = LexiconTable::shared();
        prop_assert_eq!(table.match_text(&text), table.match_text(&text));
        prop_assert_eq!(scorer.evaluate(&text), scorer.evaluate(&text));
    }

    #[test]
    fn test_drift_bounded(values in prop::collection::vec(0.0..=1.0f64, 0..60)) {
        let mut smoother = DriftSmoother::default();
        for v in values {
            let drifted = smoother.compute_drifted(v);
            prop_assert!((0.0..=1.0).contains(&drifted));
            prop_assert!(smoother.len() <= DRIFT_CAPACITY);
        }
    }

    #[test]
    fn test_drift_respects_configured_capacity(
        config in arb_drift_config(),
        values in prop::collection::vec(0.0..=1.0f64, 0..60)
    ) {
        let mut smoother = DriftSmoother::new(config);
        for v in values {
            let drifted = smoother.compute_drifted(v);
            prop_assert!((0.0..=1.0).contains(&drifted));
            prop_assert!(smoother.len() <= config.capacity);
        }
    }

    #[test]
    fn test_drift_converges(start in 0.0..=1.0f64, target in 0.0..=1.0f64) {
        let mut smoother = DriftSmoother::default();
        smoother.compute_drifted(start);
        let mut last = start;
        for _ in 0..(DRIFT_CAPACITY + 5) {
            last = smoother.compute_drifted(target);
        }
        prop_assert!((last - target).abs() < 1e-9, "{} vs {}", last, target);
    }

    #[test]
    fn test_coaching_confidence_bounded(text in arb_text(), avg in 0.0..200.0f64, rapid in any::<bool>()) {
        let history = PromptHistory { avg_prompt_len: avg, rapid_fire: rapid, ..Default::default() };
        let analysis = PromptCoach::new().analyze(&text, &history);
        prop_assert!(analysis.confidence >= 0.0);
        prop_assert!(analysis.confidence <= COACH_CONFIDENCE_CAP);
    }

    #[test]
    fn test_normalize_idempotent(score in -50.0..250.0f64, use_hri in any::<bool>()) {
        let payload = if use_hri { json!({ "hri": score / 100.0 }) } else { json!({ "score": score }) };
        let once = normalize(&payload);
        let twice = normalize(&once);
        prop_assert_eq!(&once["hri"], &twice["hri"]);
        prop_assert_eq!(&once["hugoScore"], &twice["hugoScore"]);
    }
}
