//! Lexicon: the single keyword table shared by every tone/HRI call site
//!
//! Each tone carries an ordered pattern list and a base weight.
//! The table also carries the resonance cues used by the additive HRI formula.

use std::collections::HashSet;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::LexiconConfig;
use crate::error::{HugoError, HugoResult};
use crate::types::{ToneCategory, ToneHits};
use crate::{CUE_NEGATIVE, CUE_POSITIVE, CUE_REFLECTIVE, CUE_URGENT};

// =============================================================================
// Built-in patterns (matched case-insensitively, word-bounded)
// =============================================================================

const URGENT_PATTERNS: &[&str] = &[
    r"urgent(ly)?", r"asap", r"immediately", r"critical(ly)?", r"emergency",
    r"hurry", r"deadline", r"right now", r"time[- ]sensitive",
];

const DISSONANT_PATTERNS: &[&str] = &[
    r"broken", r"errors?", r"fail(s|ed|ing|ure)?", r"wrong", r"bugs?",
    r"crash(es|ed|ing)?", r"nothing works", r"(doesn't|does not|don't|won't|isn't) work(ing)?",
    r"not working", r"frustrat(ed|ing|ion)", r"annoy(ed|ing)", r"useless", r"terrible", r"awful",
];

const RESONANT_PATTERNS: &[&str] = &[
    r"perfect(ly)?", r"amazing", r"wonderful", r"excellent", r"brilliant",
    r"fantastic", r"awesome", r"love", r"great", r"beautiful(ly)?",
];

const REFLECTIVE_PATTERNS: &[&str] = &[
    r"wonder(ing)?", r"perhaps", r"consider(ing)?", r"reflect(ing|ion)?", r"ponder(ing)?",
    r"curious", r"i think", r"maybe", r"on the other hand", r"it seems",
];

const CALM_PATTERNS: &[&str] = &[
    r"calm(ly)?", r"peace(ful)?", r"relax(ed|ing)?", r"gentle", r"gently",
    r"steady", r"quiet(ly)?", r"no rush", r"take your time", r"breathe",
];

/// (tone, base weight for the additive HRI formula, patterns)
const BUILTIN_TONES: &[(ToneCategory, f64, &[&str])] = &[
    (ToneCategory::Urgent, 0.75, URGENT_PATTERNS),
    (ToneCategory::Dissonant, 0.30, DISSONANT_PATTERNS),
    (ToneCategory::Resonant, 0.90, RESONANT_PATTERNS),
    (ToneCategory::Reflective, 0.60, REFLECTIVE_PATTERNS),
    (ToneCategory::Calm, 0.40, CALM_PATTERNS),
];

const POSITIVE_CUES: &[&str] = &[
    r"thanks?", r"thank you", r"great", r"helpful", r"love", r"excellent",
    r"perfect", r"amazing", r"wonderful", r"appreciate",
];

const NEGATIVE_CUES: &[&str] = &[
    r"errors?", r"fail(s|ed|ure)?", r"broken", r"wrong", r"bugs?",
    r"crash(ed)?", r"nothing works", r"not working", r"useless",
];

const REFLECTIVE_CUES: &[&str] = &[
    r"think", r"consider", r"understand", r"wonder", r"reflect", r"perhaps",
];

const URGENT_CUES: &[&str] = &[
    r"urgent", r"asap", r"immediately", r"now", r"quickly", r"critical",
];

/// (cue name, HRI delta, patterns); each cue applies once when present
const BUILTIN_CUES: &[(&str, f64, &[&str])] = &[
    ("positive", CUE_POSITIVE, POSITIVE_CUES),
    ("negative", CUE_NEGATIVE, NEGATIVE_CUES),
    ("reflective", CUE_REFLECTIVE, REFLECTIVE_CUES),
    ("urgent", CUE_URGENT, URGENT_CUES),
];

lazy_static! {
    static ref BUILTIN: Arc<LexiconTable> = Arc::new(LexiconTable::builtin_uncached());
}

/// One tone's slice of the table
#[derive(Debug, Clone)]
pub struct LexiconEntry {
    pub tone: ToneCategory,
    pub base_weight: f64,
    patterns: Vec<Regex>,
}

impl LexiconEntry {
    /// Non-overlapping matches summed over every pattern
    pub fn count(&self, text: &str) -> usize {
        self.patterns.iter().map(|re| re.find_iter(text).count()).sum()
    }
}

/// A semantic cue that nudges the HRI up or down
#[derive(Debug, Clone)]
pub struct ResonanceCue {
    pub name: String,
    pub delta: f64,
    patterns: Vec<Regex>,
}

impl ResonanceCue {
    pub fn is_present(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// Tone → patterns + base weight, plus HRI cues
#[derive(Debug, Clone)]
pub struct LexiconTable {
    entries: Vec<LexiconEntry>,
    cues: Vec<ResonanceCue>,
}

impl LexiconTable {
    /// Shared built-in table
    pub fn shared() -> Arc<LexiconTable> {
        BUILTIN.clone()
    }

    fn builtin_uncached() -> Self {
        let entries = BUILTIN_TONES
            .iter()
            .map(|(tone, weight, patterns)| LexiconEntry {
                tone: *tone,
                base_weight: *weight,
                patterns: patterns.iter().map(|p| Regex::new(&word_bounded(p)).unwrap()).collect(),
            })
            .collect();
        let cues = BUILTIN_CUES
            .iter()
            .map(|(name, delta, patterns)| ResonanceCue {
                name: (*name).to_string(),
                delta: *delta,
                patterns: patterns.iter().map(|p| Regex::new(&word_bounded(p)).unwrap()).collect(),
            })
            .collect();
        Self { entries, cues }
    }

    /// Build from config pattern strings. The config defines the whole table,
    /// so a lexicon without cues scores on base weights alone.
    pub fn from_config(config: &LexiconConfig) -> HugoResult<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(config.tones.len());

        for entry in &config.tones {
            let tone: ToneCategory = entry.tone.parse().map_err(HugoError::Config)?;
            if !seen.insert(tone) {
                return Err(HugoError::Config(format!("tone {} listed twice in lexicon", tone)));
            }
            if !entry.base_weight.is_finite() {
                return Err(HugoError::Config(format!("base weight for {} is not finite", tone)));
            }

            let patterns = entry
                .patterns
                .iter()
                .map(|p| {
                    Regex::new(&word_bounded(p)).map_err(|source| HugoError::Pattern {
                        tone,
                        pattern: p.clone(),
                        source,
                    })
                })
                .collect::<HugoResult<Vec<_>>>()?;

            entries.push(LexiconEntry {
                tone,
                base_weight: entry.base_weight.clamp(0.0, 1.0),
                patterns,
            });
        }

        let mut cue_names = HashSet::new();
        let mut cues = Vec::with_capacity(config.cues.len());

        for cue in &config.cues {
            if !cue_names.insert(cue.name.as_str()) {
                return Err(HugoError::Config(format!("cue {} listed twice in lexicon", cue.name)));
            }
            if !cue.delta.is_finite() {
                return Err(HugoError::Config(format!("delta for cue {} is not finite", cue.name)));
            }

            let patterns = cue
                .patterns
                .iter()
                .map(|p| {
                    Regex::new(&word_bounded(p)).map_err(|source| HugoError::CuePattern {
                        cue: cue.name.clone(),
                        pattern: p.clone(),
                        source,
                    })
                })
                .collect::<HugoResult<Vec<_>>>()?;

            cues.push(ResonanceCue {
                name: cue.name.clone(),
                delta: cue.delta.clamp(-1.0, 1.0),
                patterns,
            });
        }

        Ok(Self { entries, cues })
    }

    /// Score text against every tone
    pub fn match_text(&self, text: &str) -> ToneHits {
        let mut hits = ToneHits::zero();
        for entry in &self.entries {
            hits.add(entry.tone, entry.count(text));
        }
        hits
    }

    /// Base weight for a tone; tones missing from the table sit at the midpoint
    pub fn base_weight(&self, tone: ToneCategory) -> f64 {
        self.entries
            .iter()
            .find(|e| e.tone == tone)
            .map(|e| e.base_weight)
            .unwrap_or(crate::HRI_DEFAULT)
    }

    /// Cues present in the text
    pub fn matched_cues<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a ResonanceCue> + 'a {
        self.cues.iter().filter(move |cue| cue.is_present(text))
    }
}

fn word_bounded(pattern: &str) -> String {
    format!(r"(?i)\b(?:{})\b", pattern)
}

// =============================================================================
// TESTS
// =============================================================================
