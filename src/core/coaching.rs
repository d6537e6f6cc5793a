//! Prompt coaching heuristics: classifies an outgoing user prompt
//!
//! Three layers:
//! - Keyword: per-state pattern hits, most hits wins
//! - Syntax: caps ratio, exclamations, sentence length, punctuation density
//! - Pattern: short-vs-average prompt and rapid-fire sends (confidence boost only)
//!
//! Keyword and syntax candidates compete on confidence × layer weight (0.5 / 0.3).
//! Stateless: history is passed in, the caller updates it afterwards.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{CoachingAnalysis, CoachingCandidate, CoachingState, PatternSignal, PromptHistory};
use crate::{
    COACH_BOOST_RAPID_FIRE, COACH_BOOST_SHORT_PROMPT, COACH_CONFIDENCE_CAP, COACH_THRESHOLD,
    COACH_WEIGHT_KEYWORD, COACH_WEIGHT_SYNTAX,
};

lazy_static! {
    // =========================================================================
    // URGENCY: time pressure
    // =========================================================================
    static ref RE_URGENCY: Regex = Regex::new(
        r"(?i)\b(asap|as soon as possible|urgent(ly)?|immediately|right now|quickly|hurry|deadline|emergency)\b"
    ).unwrap();

    // =========================================================================
    // FRUSTRATION: negation, failure, repetition
    // =========================================================================
    static ref RE_FRUSTRATION: Regex = Regex::new(
        r"(?i)\b(not working|doesn't work|does not work|nothing works|still (broken|failing|wrong)|broken|useless|wrong again|again|tried everything|why (won't|doesn't|isn't)|ugh|frustrat(ed|ing))\b"
    ).unwrap();

    // =========================================================================
    // CONFUSION: clarification seeking
    // =========================================================================
    static ref RE_CONFUSION: Regex = Regex::new(
        r"(?i)\b(confused|confusing|don't understand|do not understand|what do you mean|unclear|not sure|explain|how do i|lost)\b"
    ).unwrap();

    static ref RE_MULTI_QUESTION: Regex = Regex::new(r"\?{2,}").unwrap();

    // =========================================================================
    // CLARITY: politeness, specificity
    // =========================================================================
    static ref RE_CLARITY: Regex = Regex::new(
        r"(?i)\b(please|specifically|for example|step by step|could you|would you|thanks|thank you|exactly|context|format)\b"
    ).unwrap();
}

/// Scalar features read by the syntax layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SyntaxFeatures {
    /// Uppercase letters / letters; 0 when there are none
    pub caps_ratio: f64,
    pub exclamations: usize,
    /// Words per sentence, sentences split on . ! ?
    pub avg_sentence_len: f64,
    /// ASCII punctuation chars / all chars
    pub punctuation_density: f64,
    pub question_marks: usize,
    pub word_count: usize,
}

impl SyntaxFeatures {
    pub fn extract(text: &str) -> Self {
        let total_chars = text.chars().count();
        if total_chars == 0 {
            return Self::default();
        }

        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        let punctuation = text.chars().filter(|c| c.is_ascii_punctuation()).count();
        let exclamations = text.matches('!').count();
        let question_marks = text.matches('?').count();
        let word_count = text.split_whitespace().count();

        let sentences: Vec<usize> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.split_whitespace().count())
            .collect();
        let avg_sentence_len = if sentences.is_empty() {
            0.0
        } else {
            sentences.iter().sum::<usize>() as f64 / sentences.len() as f64
        };

        Self {
            caps_ratio: if letters == 0 { 0.0 } else { uppercase as f64 / letters as f64 },
            exclamations,
            avg_sentence_len,
            punctuation_density: punctuation as f64 / total_chars as f64,
            question_marks,
            word_count,
        }
    }
}

/// Prompt coaching analyzer
#[derive(Debug, Default)]
pub struct PromptCoach;

impl PromptCoach {
    pub fn new() -> Self {
        Self
    }

    /// Classify one prompt against the session history
    pub fn analyze(&self, text: &str, history: &PromptHistory) -> CoachingAnalysis {
        let text = text.trim();

        if text.is_empty() {
            let empty = CoachingCandidate::new(CoachingState::Neutral, 0.0, "empty prompt");
            return CoachingAnalysis {
                state: CoachingState::Neutral,
                confidence: 0.0,
                reason: "empty prompt".into(),
                should_coach: false,
                word_count: 0,
                keyword: empty.clone(),
                syntax: empty,
                pattern: PatternSignal::default(),
            };
        }

        let features = SyntaxFeatures::extract(text);
        let keyword = self.keyword_layer(text);
        let syntax = self.syntax_layer(&features);
        let pattern = self.pattern_layer(features.word_count, history);

        let keyword_wins =
            keyword.confidence * COACH_WEIGHT_KEYWORD >= syntax.confidence * COACH_WEIGHT_SYNTAX;
        let (winner, layer) = if keyword_wins {
            (&keyword, "keyword")
        } else {
            (&syntax, "syntax")
        };

        let confidence = (winner.confidence + pattern.boost).clamp(0.0, COACH_CONFIDENCE_CAP);

        let mut reason = format!("{} layer: {}", layer, winner.reason);
        if pattern.short_prompt {
            reason.push_str("; shift: much shorter than usual");
        }
        if pattern.rapid_fire {
            reason.push_str("; shift: rapid-fire sending");
        }

        CoachingAnalysis {
            state: winner.state,
            confidence,
            reason,
            should_coach: confidence >= COACH_THRESHOLD,
            word_count: features.word_count,
            keyword,
            syntax,
            pattern,
        }
    }

    /// Layer 1: per-state pattern hits
    pub fn keyword_layer(&self, text: &str) -> CoachingCandidate {
        let mut best = CoachingState::Neutral;
        let mut best_hits = 0;

        for state in CoachingState::KEYWORD_ORDER {
            let hits = keyword_hits(state, text);
            if hits > best_hits {
                best = state;
                best_hits = hits;
            }
        }

        if best_hits == 0 {
            return CoachingCandidate::new(CoachingState::Neutral, 0.55, "no keyword hits");
        }

        let confidence = (0.65 + best_hits as f64 * 0.07).min(0.92);
        CoachingCandidate::new(best, confidence, format!("{} keyword hit(s) for {}", best_hits, best))
    }

    /// Layer 2: fixed decision cascade over syntax features, first match wins
    pub fn syntax_layer(&self, f: &SyntaxFeatures) -> CoachingCandidate {
        if f.caps_ratio > 0.3 || f.exclamations > 2 {
            CoachingCandidate::new(
                CoachingState::Urgency,
                0.8,
                format!("caps ratio {:.2}, {} exclamation(s)", f.caps_ratio, f.exclamations),
            )
        } else if f.avg_sentence_len > 0.0 && f.avg_sentence_len < 5.0 && f.exclamations > 0 {
            CoachingCandidate::new(
                CoachingState::Frustration,
                0.7,
                format!("short exclamatory sentences ({:.1} words avg)", f.avg_sentence_len),
            )
        } else if f.question_marks > 2 || f.word_count > 120 {
            CoachingCandidate::new(
                CoachingState::Confusion,
                0.65,
                format!("{} question mark(s), {} words", f.question_marks, f.word_count),
            )
        } else if f.avg_sentence_len > 10.0 && f.punctuation_density > 0.01 && f.word_count >= 12 {
            CoachingCandidate::new(
                CoachingState::Clarity,
                0.7,
                format!("structured sentences ({:.1} words avg)", f.avg_sentence_len),
            )
        } else {
            CoachingCandidate::new(CoachingState::Neutral, 0.5, "no syntax signal")
        }
    }

    /// Layer 3: history shift, never picks a state
    pub fn pattern_layer(&self, word_count: usize, history: &PromptHistory) -> PatternSignal {
        let mut signal = PatternSignal::default();

        if history.avg_prompt_len > 0.0 && (word_count as f64) < history.avg_prompt_len * 0.5 {
            signal.short_prompt = true;
            signal.shift_detected = true;
            signal.boost += COACH_BOOST_SHORT_PROMPT;
        }

        if history.rapid_fire {
            signal.rapid_fire = true;
            signal.shift_detected = true;
            signal.boost += COACH_BOOST_RAPID_FIRE;
        }

        signal
    }
}

fn keyword_hits(state: CoachingState, text: &str) -> usize {
    match state {
        CoachingState::Urgency => RE_URGENCY.find_iter(text).count(),
        CoachingState::Frustration => RE_FRUSTRATION.find_iter(text).count(),
        CoachingState::Confusion => {
            RE_CONFUSION.find_iter(text).count() + RE_MULTI_QUESTION.find_iter(text).count()
        }
        CoachingState::Clarity => RE_CLARITY.find_iter(text).count(),
        CoachingState::Neutral => 0,
    }
}

// =============================================================================
// TESTS
// =============================================================================
