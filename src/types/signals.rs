//! Lexicon hit counts and scored text

use serde::{Deserialize, Serialize};
use crate::types::ToneCategory;

/// Pattern hits per tone category, as produced by the lexicon matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneHits {
    /// urgent / asap / critical / deadline
    pub urgent: usize,
    /// broken / error / nothing works
    pub dissonant: usize,
    /// perfect / amazing / wonderful
    pub resonant: usize,
    /// wonder / perhaps / consider
    pub reflective: usize,
    /// calm / steady / gentle
    pub calm: usize,
}

impl ToneHits {
    /// Create zero hits
    pub fn zero() -> Self {
        Self::default()
    }

    /// Hits for one category
    pub fn get(&self, tone: ToneCategory) -> usize {
        match tone {
            ToneCategory::Urgent => self.urgent,
            ToneCategory::Dissonant => self.dissonant,
            ToneCategory::Resonant => self.resonant,
            ToneCategory::Reflective => self.reflective,
            ToneCategory::Calm => self.calm,
        }
    }

    /// Add hits to one category
    pub fn add(&mut self, tone: ToneCategory, hits: usize) {
        let slot = match tone {
            ToneCategory::Urgent => &mut self.urgent,
            ToneCategory::Dissonant => &mut self.dissonant,
            ToneCategory::Resonant => &mut self.resonant,
            ToneCategory::Reflective => &mut self.reflective,
            ToneCategory::Calm => &mut self.calm,
        };
        *slot += hits;
    }

    /// Sum across all categories
    pub fn total(&self) -> usize {
        self.urgent + self.dissonant + self.resonant + self.reflective + self.calm
    }
}

/// One scored message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    pub text: String,
    pub tone: ToneCategory,
    /// Hugo Resonance Index, 0.0-1.0
    pub hri: f64,
    /// Milliseconds since epoch, taken from the extracted message
    pub timestamp: i64,
}

impl ScoredText {
    pub fn new(text: impl Into<String>, tone: ToneCategory, hri: f64, timestamp: i64) -> Self {
        Self {
            text: text.into(),
            tone,
            hri,
            timestamp,
        }
    }

    /// Legacy 0-100 score derived from the HRI
    pub fn legacy_score(&self) -> u8 {
        crate::core::normalizer::legacy_score(self.hri)
    }
}
