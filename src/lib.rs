//! Hugo Resonance: deterministic scoring core for the Hugo HUD
//!
//! Raw reply text → lexicon → tone → HRI → drift → normalized payload.
//! User prompt text + history → coaching heuristics → coaching state.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::{HugoError, HugoResult};

// =============================================================================
// RESONANCE (HRI)
// =============================================================================

/// HRI returned for degenerate input (empty/whitespace text, non-finite math)
pub const HRI_DEFAULT: f64 = 0.5;

/// Texts at least this long (chars) earn the length cue
pub const HRI_LONG_TEXT_CHARS: usize = 200;

/// Resonance cue deltas for the additive HRI formula
pub const CUE_POSITIVE: f64 = 0.10;
pub const CUE_NEGATIVE: f64 = -0.15;
pub const CUE_REFLECTIVE: f64 = 0.05;
pub const CUE_URGENT: f64 = 0.05;
pub const CUE_LENGTH: f64 = 0.05;

// =============================================================================
// DRIFT
// =============================================================================

/// Drift buffer capacity (~5 s at 500 ms sampling)
pub const DRIFT_CAPACITY: usize = 10;

/// Per-step weight decay for older drift samples
pub const DRIFT_DECAY: f64 = 0.85;

// =============================================================================
// COACHING
// =============================================================================

/// Layer weights used when comparing keyword vs syntax candidates
pub const COACH_WEIGHT_KEYWORD: f64 = 0.5;
pub const COACH_WEIGHT_SYNTAX: f64 = 0.3;

/// Confidence needed before a coaching card is worth showing
pub const COACH_THRESHOLD: f64 = 0.60;

/// Ceiling on final coaching confidence
pub const COACH_CONFIDENCE_CAP: f64 = 0.99;

/// Pattern-layer boosts
pub const COACH_BOOST_SHORT_PROMPT: f64 = 0.12;
pub const COACH_BOOST_RAPID_FIRE: f64 = 0.10;

/// Rolling window for rapid-fire detection (milliseconds)
pub const RAPID_FIRE_WINDOW_MS: i64 = 60_000;

/// Sends within the window that count as rapid-fire
pub const RAPID_FIRE_MIN_SENDS: usize = 3;

/// Default snooze after a dismiss (minutes)
pub const COACH_SNOOZE_MINUTES: u32 = 60;

/// Default minimum gap between two coaching cards (seconds)
pub const COACH_MIN_SECONDS_BETWEEN: u32 = 45;

// =============================================================================
// HOST
// =============================================================================

/// Content cap applied before scoring (chars)
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Scoring poll cadence (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 2500;

/// Enhanced analyzer results slower than this are discarded (milliseconds)
pub const ANALYZER_DEADLINE_MS: u64 = 1000;

/// Sessions untouched for this long are dropped (milliseconds)
pub const SESSION_IDLE_TTL_MS: u64 = 30 * 60 * 1000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
