//! Core types for Hugo Resonance

mod tone;
mod signals;
mod message;
mod coaching;
mod history;

pub use tone::ToneCategory;
pub use signals::{ToneHits, ScoredText};
pub use message::{Platform, ExtractedMessage, NormalizedResonance, OutputMessage};
pub use coaching::{
    CoachingState, CoachingCandidate, CoachingAnalysis, CoachingOutput,
    CoachingScript, PatternSignal, Visuals,
};
pub use history::PromptHistory;
