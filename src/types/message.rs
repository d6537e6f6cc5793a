//! Messages exchanged with the scraping and rendering collaborators

use serde::{Deserialize, Serialize};
use crate::types::{ScoredText, ToneCategory};

/// Chat platform a message was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Chatgpt,
    Claude,
    Gemini,
    Copilot,
    #[serde(other)]
    Unknown,
}

impl Platform {
    /// Map a free-form source name onto a known platform
    pub fn from_source(source: &str) -> Self {
        let source = source.to_ascii_lowercase();
        if source.contains("chatgpt") || source.contains("openai") {
            Platform::Chatgpt
        } else if source.contains("claude") {
            Platform::Claude
        } else if source.contains("gemini") || source.contains("bard") {
            Platform::Gemini
        } else if source.contains("copilot") {
            Platform::Copilot
        } else {
            Platform::Unknown
        }
    }
}

/// One message as delivered by the DOM scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMessage {
    pub id: String,
    /// Platform name, e.g. "chatgpt"
    pub source: String,
    pub content: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
}

impl ExtractedMessage {
    pub fn new(id: impl Into<String>, source: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::from_source(&self.source)
    }

    /// Copy with content cut to at most `max_chars` characters
    pub fn truncated(&self, max_chars: usize) -> Self {
        let content = match self.content.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => self.content[..byte_idx].to_string(),
            None => self.content.clone(),
        };
        Self {
            content,
            ..self.clone()
        }
    }
}

/// Canonical `{hri, hugoScore}` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResonance {
    /// 0.0-1.0, `None` when no recognized source field was present
    pub hri: Option<f64>,
    /// round(hri * 100), derived only
    pub hugo_score: Option<u8>,
}

/// Scored message handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMessage {
    pub id: String,
    pub source: String,
    /// Known platform behind `source`, for per-platform styling
    pub platform: Platform,
    pub text: String,
    pub tone: ToneCategory,
    /// Single element today; array for multi-tone output later
    pub emotional_tones: Vec<ToneCategory>,
    pub hri: Option<f64>,
    pub hugo_score: Option<u8>,
    /// HRI after temporal smoothing on the HUD surface
    pub drifted_hri: f64,
    pub timestamp: i64,
}

impl OutputMessage {
    pub fn new(message: &ExtractedMessage, scored: ScoredText, resonance: NormalizedResonance, drifted_hri: f64) -> Self {
        Self {
            id: message.id.clone(),
            source: message.source.clone(),
            platform: message.platform(),
            emotional_tones: vec![scored.tone],
            tone: scored.tone,
            text: scored.text,
            hri: resonance.hri,
            hugo_score: resonance.hugo_score,
            drifted_hri,
            timestamp: scored.timestamp,
        }
    }

    /// One-line terminal rendering
    pub fn to_parseable_string(&self) -> String {
        format!(
            "tone={} | hri={} | score={} | drift={:.3}",
            self.tone,
            self.hri.map(|h| format!("{:.3}", h)).unwrap_or_else(|| "null".into()),
            self.hugo_score.map(|s| s.to_string()).unwrap_or_else(|| "null".into()),
            self.drifted_hri,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_char_safe() {
        let msg = ExtractedMessage::new("m1", "claude", "héllo wörld", 0);
        assert_eq!(msg.truncated(4).content, "héll");
        assert_eq!(msg.truncated(100).content, "héllo wörld");
        assert_eq!(msg.truncated(0).content, "");
    }

    #[test]
    fn test_platform_from_source() {
        assert_eq!(Platform::from_source("ChatGPT"), Platform::Chatgpt);
        assert_eq!(Platform::from_source("claude.ai"), Platform::Claude);
        assert_eq!(Platform::from_source("gemini"), Platform::Gemini);
        assert_eq!(Platform::from_source("copilot"), Platform::Copilot);
        assert_eq!(Platform::from_source("mystery"), Platform::Unknown);

        let p: Platform = serde_json::from_str("\"perplexity\"").unwrap();
        assert_eq!(p, Platform::Unknown);
    }

    #[test]
    fn test_output_carries_platform() {
        let msg = ExtractedMessage::new("m1", "OpenAI ChatGPT", "ok", 7);
        let scored = ScoredText { text: "ok".into(), tone: ToneCategory::Calm, hri: 0.4, timestamp: 7 };
        let resonance = NormalizedResonance { hri: Some(0.4), hugo_score: Some(40) };
        let out = OutputMessage::new(&msg, scored, resonance, 0.4);

        assert_eq!(out.platform, Platform::Chatgpt);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["platform"], "chatgpt");
        assert_eq!(json["source"], "OpenAI ChatGPT");
    }
}
