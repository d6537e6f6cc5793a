use thiserror::Error;

use crate::types::ToneCategory;

#[derive(Error, Debug)]
pub enum HugoError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lexicon Error: pattern {pattern:?} for tone {tone} does not compile: {source}")]
    Pattern {
        tone: ToneCategory,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Lexicon Error: pattern {pattern:?} for cue {cue} does not compile: {source}")]
    CuePattern {
        cue: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Analyzer Error: {0}")]
    Analyzer(String),
}

pub type HugoResult<T> = Result<T, HugoError>;
