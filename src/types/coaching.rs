//! Coaching state, per-layer candidates and display tables

use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

/// Classification of an outgoing user prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachingState {
    /// Time pressure
    Urgency,
    /// Negation, repeated failure
    Frustration,
    /// Clarification seeking
    Confusion,
    /// Polite, specific prompt
    Clarity,
    /// Nothing to say
    #[default]
    Neutral,
}

impl CoachingState {
    /// Keyword-layer tie-break order: earlier wins
    pub const KEYWORD_ORDER: [CoachingState; 4] = [
        CoachingState::Urgency,
        CoachingState::Frustration,
        CoachingState::Confusion,
        CoachingState::Clarity,
    ];

    /// Terminal color used by the CLI
    pub fn color(&self) -> Color {
        match self {
            CoachingState::Urgency => Color::Yellow,
            CoachingState::Frustration => Color::Red,
            CoachingState::Confusion => Color::Magenta,
            CoachingState::Clarity => Color::Green,
            CoachingState::Neutral => Color::BrightBlack,
        }
    }

    /// Static badge content for the coaching UI
    pub fn visuals(&self) -> Visuals {
        match self {
            CoachingState::Urgency => Visuals { icon: "⚡", color: "#f59e0b", label: "Urgency detected" },
            CoachingState::Frustration => Visuals { icon: "😤", color: "#ef4444", label: "Frustration detected" },
            CoachingState::Confusion => Visuals { icon: "❓", color: "#8b5cf6", label: "Confusion detected" },
            CoachingState::Clarity => Visuals { icon: "✅", color: "#10b981", label: "Clear prompt" },
            CoachingState::Neutral => Visuals { icon: "💬", color: "#6b7280", label: "Neutral" },
        }
    }

    /// Static coaching card content
    pub fn script(&self) -> CoachingScript {
        match self {
            CoachingState::Urgency => CoachingScript {
                title: "Slow down to speed up",
                insight: "Rushed prompts often leave out the context the model needs.",
                suggestions: &[
                    "State the deadline and what 'done' looks like",
                    "List the constraints up front",
                    "Ask for the most important part first",
                ],
                example: "I need a working login form by 5pm. Start with email validation; styling can wait.",
            },
            CoachingState::Frustration => CoachingScript {
                title: "Reset the thread",
                insight: "Repeating the same ask rarely changes the answer.",
                suggestions: &[
                    "Describe what you tried and what happened",
                    "Paste the exact error message",
                    "Say what you expected instead",
                ],
                example: "The script still fails with 'KeyError: user_id' on line 42. The input file has that column. What else could cause it?",
            },
            CoachingState::Confusion => CoachingScript {
                title: "Ask for the explanation you need",
                insight: "Naming what is unclear lets the model target its explanation.",
                suggestions: &[
                    "Quote the part that lost you",
                    "Say how familiar you are with the topic",
                    "Ask for an example or analogy",
                ],
                example: "What does 'idempotent' mean for my API? I'm new to REST, an example would help.",
            },
            CoachingState::Clarity => CoachingScript {
                title: "Nice, this prompt is clear",
                insight: "Specific, polite prompts tend to get precise answers.",
                suggestions: &[
                    "Keep giving examples like this",
                    "Mention the output format you want",
                ],
                example: "Could you summarize this article in three bullet points, focusing on the methodology?",
            },
            CoachingState::Neutral => CoachingScript {
                title: "Add a little context",
                insight: "A sentence of context often sharpens the reply.",
                suggestions: &[
                    "Say who the answer is for",
                    "Mention any constraints",
                ],
                example: "Explain recursion for a first-year student, using a short Python example.",
            },
        }
    }
}

impl std::fmt::Display for CoachingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CoachingState::Urgency => "URGENCY",
            CoachingState::Frustration => "FRUSTRATION",
            CoachingState::Confusion => "CONFUSION",
            CoachingState::Clarity => "CLARITY",
            CoachingState::Neutral => "NEUTRAL",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visuals {
    pub icon: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoachingScript {
    pub title: &'static str,
    pub insight: &'static str,
    pub suggestions: &'static [&'static str],
    pub example: &'static str,
}

/// Output of one scoring layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingCandidate {
    pub state: CoachingState,
    pub confidence: f64,
    pub reason: String,
}

impl CoachingCandidate {
    pub fn new(state: CoachingState, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            state,
            confidence,
            reason: reason.into(),
        }
    }
}

/// Contribution of the pattern/history layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSignal {
    pub boost: f64,
    pub shift_detected: bool,
    pub short_prompt: bool,
    pub rapid_fire: bool,
}

/// Aggregated result of analyzing one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingAnalysis {
    pub state: CoachingState,
    /// Clamped to [0, 0.99]
    pub confidence: f64,
    /// Diagnostic only
    pub reason: String,
    pub should_coach: bool,
    pub word_count: usize,
    pub keyword: CoachingCandidate,
    pub syntax: CoachingCandidate,
    pub pattern: PatternSignal,
}

/// What the coaching UI receives
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingOutput {
    pub state: CoachingState,
    pub confidence: f64,
    pub reason: String,
    /// `shouldCoach` and the eligibility gate both passed
    pub show: bool,
    pub visuals: Visuals,
    pub script: CoachingScript,
}

impl CoachingOutput {
    pub fn new(analysis: &CoachingAnalysis, show: bool) -> Self {
        Self {
            state: analysis.state,
            confidence: analysis.confidence,
            reason: analysis.reason.clone(),
            show,
            visuals: analysis.state.visuals(),
            script: analysis.state.script(),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{} {} ({:.0}%) | {}",
            self.visuals.icon,
            self.state,
            self.confidence * 100.0,
            self.reason
        )
        .as_str()
        .color(self.state.color())
        .to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | confidence={:.2} | show={} | reason={}",
            self.state, self.confidence, self.show, self.reason
        )
    }
}
