//! Tone category definitions

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five tone categories a reply can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneCategory {
    /// Time pressure, escalation
    #[serde(alias = "tense")]
    Urgent,
    /// Errors, failure, negative sentiment
    Dissonant,
    /// Strong positive sentiment
    Resonant,
    /// Thinking out loud, considering
    #[serde(alias = "drift")]
    Reflective,
    /// No strong signal (default)
    #[default]
    Calm,
}

impl ToneCategory {
    /// Tie-break order: earlier wins when hit counts are equal
    pub const PRIORITY: [ToneCategory; 5] = [
        ToneCategory::Urgent,
        ToneCategory::Dissonant,
        ToneCategory::Resonant,
        ToneCategory::Reflective,
        ToneCategory::Calm,
    ];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneCategory::Urgent => "urgent",
            ToneCategory::Dissonant => "dissonant",
            ToneCategory::Resonant => "resonant",
            ToneCategory::Reflective => "reflective",
            ToneCategory::Calm => "calm",
        }
    }

    /// Get emoji for tone
    pub fn emoji(&self) -> &'static str {
        match self {
            ToneCategory::Urgent => "⚡",
            ToneCategory::Dissonant => "🔻",
            ToneCategory::Resonant => "✨",
            ToneCategory::Reflective => "🌀",
            ToneCategory::Calm => "🌊",
        }
    }

    /// Terminal color name used by the CLI
    pub fn color(&self) -> colored::Color {
        match self {
            ToneCategory::Urgent => colored::Color::Yellow,
            ToneCategory::Dissonant => colored::Color::Red,
            ToneCategory::Resonant => colored::Color::Green,
            ToneCategory::Reflective => colored::Color::Magenta,
            ToneCategory::Calm => colored::Color::Cyan,
        }
    }
}

impl FromStr for ToneCategory {
    type Err = String;

    /// Accepts canonical names and the legacy `tense` / `drift` aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" | "tense" => Ok(ToneCategory::Urgent),
            "dissonant" => Ok(ToneCategory::Dissonant),
            "resonant" => Ok(ToneCategory::Resonant),
            "reflective" | "drift" => Ok(ToneCategory::Reflective),
            "calm" => Ok(ToneCategory::Calm),
            other => Err(format!("unknown tone category: {other}")),
        }
    }
}

impl std::fmt::Display for ToneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
