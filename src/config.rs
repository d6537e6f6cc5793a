//! Runtime configuration, loadable from JSON. Every field has a default.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HugoError, HugoResult};
use crate::{
    ANALYZER_DEADLINE_MS, COACH_MIN_SECONDS_BETWEEN, COACH_SNOOZE_MINUTES, DRIFT_CAPACITY,
    DRIFT_DECAY, MAX_CONTENT_CHARS, POLL_INTERVAL_MS, SESSION_IDLE_TTL_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Content cap applied before scoring
    pub max_content_chars: usize,
    /// Poller cadence for queued messages
    pub poll_interval_ms: u64,
    /// Budget for the enhanced analyzer before the keyword path takes over
    pub analyzer_deadline_ms: u64,
    /// API sessions idle longer than this are dropped
    pub session_idle_ttl_ms: u64,
    pub drift: DriftConfig,
    pub coaching: CoachingSettings,
    /// Replaces the built-in lexicon when present
    pub lexicon: Option<LexiconConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_content_chars: MAX_CONTENT_CHARS,
            poll_interval_ms: POLL_INTERVAL_MS,
            analyzer_deadline_ms: ANALYZER_DEADLINE_MS,
            session_idle_ttl_ms: SESSION_IDLE_TTL_MS,
            drift: DriftConfig::default(),
            coaching: CoachingSettings::default(),
            lexicon: None,
        }
    }
}

impl ScoringConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> HugoResult<Self> {
        let path = path.as_ref();
        info!("Loading scoring config from {:?}", path);
        let raw = std::fs::read_to_string(path)?;
        let config: ScoringConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HugoResult<()> {
        if self.drift.capacity == 0 {
            return Err(HugoError::Config("drift.capacity must be at least 1".into()));
        }
        if !(self.drift.decay > 0.0 && self.drift.decay <= 1.0) {
            return Err(HugoError::Config(format!(
                "drift.decay must be in (0, 1], got {}",
                self.drift.decay
            )));
        }
        if self.max_content_chars == 0 {
            return Err(HugoError::Config("max_content_chars must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(HugoError::Config("poll_interval_ms must be at least 1".into()));
        }
        if self.analyzer_deadline_ms == 0 {
            return Err(HugoError::Config("analyzer_deadline_ms must be at least 1".into()));
        }
        if self.session_idle_ttl_ms == 0 {
            return Err(HugoError::Config("session_idle_ttl_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub capacity: usize,
    pub decay: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            capacity: DRIFT_CAPACITY,
            decay: DRIFT_DECAY,
        }
    }
}

/// User-facing coaching switches consumed by the eligibility gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachingSettings {
    pub enabled: bool,
    pub snooze_minutes: u32,
    pub min_seconds_between: u32,
}

impl Default for CoachingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            snooze_minutes: COACH_SNOOZE_MINUTES,
            min_seconds_between: COACH_MIN_SECONDS_BETWEEN,
        }
    }
}

/// Lexicon override: one entry per tone, in tie-break order of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub tones: Vec<ToneEntryConfig>,
    /// HRI cues of this lexicon; none when omitted
    #[serde(default)]
    pub cues: Vec<CueEntryConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneEntryConfig {
    /// Tone name; legacy aliases accepted
    pub tone: String,
    pub base_weight: f64,
    pub patterns: Vec<String>,
}

/// A resonance cue: applies `delta` once when any pattern is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueEntryConfig {
    pub name: String,
    pub delta: f64,
    pub patterns: Vec<String>,
}
