//! Resonance scorer: text + tone → Hugo Resonance Index (0.0-1.0)
//!
//! Additive formula:
//!   hri = base_weight(tone) + Σ cue deltas (+0.05 for long text), clamped to [0, 1]
//! Empty or whitespace-only text scores HRI_DEFAULT.

use std::sync::Arc;

use serde::Serialize;

use crate::core::lexicon::LexiconTable;
use crate::core::tone;
use crate::types::{ToneCategory, ToneHits};
use crate::{CUE_LENGTH, HRI_DEFAULT, HRI_LONG_TEXT_CHARS};

/// Full breakdown of one HRI computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HriReading {
    pub hits: ToneHits,
    pub tone: ToneCategory,
    pub base: f64,
    pub cues: Vec<String>,
    pub delta: f64,
    pub hri: f64,
}

#[derive(Debug, Clone)]
pub struct ResonanceScorer {
    table: Arc<LexiconTable>,
}

impl Default for ResonanceScorer {
    fn default() -> Self {
        Self::new(LexiconTable::shared())
    }
}

impl ResonanceScorer {
    pub fn new(table: Arc<LexiconTable>) -> Self {
        Self { table }
    }

    /// HRI for text already classified as `tone`
    pub fn score(&self, text: &str, tone: ToneCategory) -> f64 {
        self.reading(text, ToneHits::zero(), tone).hri
    }

    /// Match, classify and score in one pass
    pub fn evaluate(&self, text: &str) -> HriReading {
        let hits = self.table.match_text(text);
        let tone = tone::classify(&hits);
        self.reading(text, hits, tone)
    }

    fn reading(&self, text: &str, hits: ToneHits, tone: ToneCategory) -> HriReading {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return HriReading {
                hits,
                tone,
                base: HRI_DEFAULT,
                cues: Vec::new(),
                delta: 0.0,
                hri: HRI_DEFAULT,
            };
        }

        let base = self.table.base_weight(tone);
        let mut cues = Vec::new();
        let mut delta = 0.0;

        for cue in self.table.matched_cues(trimmed) {
            cues.push(cue.name.clone());
            delta += cue.delta;
        }

        if trimmed.chars().count() >= HRI_LONG_TEXT_CHARS {
            cues.push("length".to_string());
            delta += CUE_LENGTH;
        }

        HriReading {
            hits,
            tone,
            base,
            cues,
            delta,
            hri: bounded(base + delta),
        }
    }
}

/// Clamp to [0, 1]; non-finite values fall back to the default
pub fn bounded(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        HRI_DEFAULT
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_default() {
        let scorer = ResonanceScorer::default();
        assert_eq!(scorer.evaluate("").hri, HRI_DEFAULT);
        assert_eq!(scorer.evaluate("   \t\n").hri, HRI_DEFAULT);
        assert_eq!(scorer.evaluate("").tone, ToneCategory::Calm);
    }

    #[test]
    fn test_negative_text_scores_low() {
        let scorer = ResonanceScorer::default();
        let reading = scorer.evaluate("This is broken and nothing works, I've tried everything!");
        assert_eq!(reading.tone, ToneCategory::Dissonant);
        assert!((reading.hri - 0.15).abs() < 1e-9, "got {}", reading.hri);
        assert!(reading.hri < 0.5);
    }

    #[test]
    fn test_positive_text_saturates() {
        let scorer = ResonanceScorer::default();
        let reading = scorer.evaluate("perfect amazing wonderful");
        assert_eq!(reading.tone, ToneCategory::Resonant);
        assert_eq!(reading.hri, 1.0);
    }

    #[test]
    fn test_plain_text_sits_at_calm_weight() {
        let scorer = ResonanceScorer::default();
        let reading = scorer.evaluate("The function returns a list of users.");
        assert_eq!(reading.tone, ToneCategory::Calm);
        assert!((reading.hri - 0.40).abs() < 1e-9);
        assert!(reading.cues.is_empty());
    }

    #[test]
    fn test_length_cue() {
        let scorer = ResonanceScorer::default();
        let long = "The function returns a list of users. ".repeat(8);
        let reading = scorer.evaluate(&long);
        assert!(reading.cues.iter().any(|c| c == "length"));
        assert!((reading.hri - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_score_with_given_tone() {
        let scorer = ResonanceScorer::default();
        assert!((scorer.score("hello there", ToneCategory::Reflective) - 0.60).abs() < 1e-9);
        assert_eq!(scorer.score("", ToneCategory::Resonant), HRI_DEFAULT);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(1.7), 1.0);
        assert_eq!(bounded(-0.2), 0.0);
        assert_eq!(bounded(f64::NAN), HRI_DEFAULT);
        assert_eq!(bounded(f64::INFINITY), HRI_DEFAULT);
    }

    #[test]
    fn test_determinism() {
        let scorer = ResonanceScorer::default();
        let text = "I wonder whether this is broken, perhaps it's fine";
        assert_eq!(scorer.evaluate(text), scorer.evaluate(text));
    }
}
