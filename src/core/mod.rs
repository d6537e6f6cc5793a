//! Core modules for Hugo Resonance

pub mod lexicon;
pub mod tone;
pub mod hri;
pub mod drift;
pub mod normalizer;
pub mod coaching;
pub mod gate;
pub mod guard;
pub mod analyzer;
pub mod session;
pub mod api;

pub use lexicon::{LexiconTable, LexiconEntry, ResonanceCue};
pub use tone::classify;
pub use hri::{ResonanceScorer, HriReading};
pub use drift::{DriftSmoother, DriftSurface};
pub use normalizer::{normalize, resolve, legacy_score};
pub use coaching::{PromptCoach, SyntaxFeatures};
pub use gate::{CoachingGate, GateRefusal};
pub use guard::{InFlight, InFlightTicket};
pub use analyzer::{ToneAnalyzer, KeywordAnalyzer, AnalyzerChain};
pub use session::{ScoringSession, SessionSnapshot};
pub use api::{create_router, router, run_server, AppState, SessionHandle};
