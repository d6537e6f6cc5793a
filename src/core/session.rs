//! Session-scoped scoring context: one per page/tab session
//!
//! Owns everything that would otherwise be page-global: the analyzer chain,
//! one drift smoother per surface, prompt history, the coaching gate and
//! the last computed values for inspection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::core::analyzer::{AnalyzerChain, KeywordAnalyzer};
use crate::core::coaching::PromptCoach;
use crate::core::drift::{DriftSmoother, DriftSurface};
use crate::core::gate::CoachingGate;
use crate::core::lexicon::LexiconTable;
use crate::core::normalizer;
use crate::error::HugoResult;
use crate::types::{CoachingAnalysis, CoachingOutput, ExtractedMessage, OutputMessage, PromptHistory};

/// Debug view of a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub scored_count: u64,
    pub enhanced_analyzer: Option<String>,
    pub drift: HashMap<DriftSurface, Vec<f64>>,
    pub history: PromptHistory,
    pub gate: CoachingGate,
    pub last_output: Option<OutputMessage>,
    pub last_coaching: Option<CoachingAnalysis>,
    pub debug: bool,
}

#[derive(Debug)]
pub struct ScoringSession {
    id: String,
    config: ScoringConfig,
    analyzers: AnalyzerChain,
    coach: PromptCoach,
    smoothers: HashMap<DriftSurface, DriftSmoother>,
    history: PromptHistory,
    gate: CoachingGate,
    last_output: Option<OutputMessage>,
    last_coaching: Option<CoachingAnalysis>,
    scored_count: u64,
    debug: bool,
}

impl ScoringSession {
    /// Build from config; fails on invalid settings or a bad lexicon override
    pub fn new(id: impl Into<String>, config: ScoringConfig) -> HugoResult<Self> {
        config.validate()?;
        let table = match &config.lexicon {
            Some(lexicon) => Arc::new(LexiconTable::from_config(lexicon)?),
            None => LexiconTable::shared(),
        };
        let analyzers = AnalyzerChain::new(KeywordAnalyzer::new(table));
        Ok(Self::with_analyzers(id, config, analyzers))
    }

    /// The chain's enhanced-analyzer deadline is taken from the config
    pub fn with_analyzers(id: impl Into<String>, config: ScoringConfig, analyzers: AnalyzerChain) -> Self {
        let id = id.into();
        info!("scoring session {} created", id);
        let analyzers = analyzers.with_deadline(Duration::from_millis(config.analyzer_deadline_ms));

        let smoothers = DriftSurface::ALL
            .iter()
            .map(|surface| (*surface, DriftSmoother::new(config.drift)))
            .collect();

        Self {
            id,
            gate: CoachingGate::new(config.coaching),
            config,
            analyzers,
            coach: PromptCoach::new(),
            smoothers,
            history: PromptHistory::new(),
            last_output: None,
            last_coaching: None,
            scored_count: 0,
            debug: false,
        }
    }

    /// Truncate, score, normalize and smooth one scraped message
    pub fn score_message(&mut self, message: &ExtractedMessage) -> OutputMessage {
        let message = message.truncated(self.config.max_content_chars);
        let scored = self.analyzers.score_text(&message.content, message.timestamp);
        let resonance = normalizer::from_hri(scored.hri);
        let drifted = self.drift(DriftSurface::Hud, scored.hri);

        self.scored_count += 1;
        if self.debug {
            info!(
                "[{}] {} tone={} hri={:.3} drift={:.3}",
                self.id, message.id, scored.tone, scored.hri, drifted
            );
        } else {
            debug!("[{}] {} tone={} hri={:.3}", self.id, message.id, scored.tone, scored.hri);
        }

        let output = OutputMessage::new(&message, scored, resonance, drifted);
        self.last_output = Some(output.clone());
        output
    }

    /// Score messages in arrival order
    pub fn score_batch(&mut self, messages: &[ExtractedMessage]) -> Vec<OutputMessage> {
        messages.iter().map(|m| self.score_message(m)).collect()
    }

    /// Smooth a value on one surface
    pub fn drift(&mut self, surface: DriftSurface, value: f64) -> f64 {
        let drift_config = self.config.drift;
        self.smoothers
            .entry(surface)
            .or_insert_with(|| DriftSmoother::new(drift_config))
            .compute_drifted(value)
    }

    /// Analyze a sent prompt, update history, and apply the eligibility gate
    pub fn analyze_prompt(&mut self, text: &str, now_ms: i64) -> CoachingOutput {
        let analysis = self.coach.analyze(text, &self.history);

        if analysis.word_count > 0 {
            self.history.record(analysis.word_count, analysis.state, now_ms);
        }

        let show = analysis.should_coach && self.gate.can_coach(now_ms);
        if show {
            self.gate.mark_coached(now_ms);
        }
        debug!(
            "[{}] prompt state={} confidence={:.2} show={}",
            self.id, analysis.state, analysis.confidence, show
        );

        let output = CoachingOutput::new(&analysis, show);
        self.last_coaching = Some(analysis);
        output
    }

    pub fn dismiss_coaching(&mut self, now_ms: i64) {
        self.gate.dismiss(now_ms);
    }

    pub fn set_coaching_enabled(&mut self, enabled: bool) {
        self.gate.set_enabled(enabled);
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Navigation reset: drop visual history, keep prompt history
    pub fn reset(&mut self) {
        for smoother in self.smoothers.values_mut() {
            smoother.clear();
        }
        self.last_output = None;
        info!("scoring session {} reset", self.id);
    }

    pub fn history(&self) -> &PromptHistory {
        &self.history
    }

    /// Restore history persisted by the host
    pub fn restore_history(&mut self, history: PromptHistory) {
        self.history = history;
    }

    pub fn gate(&self) -> &CoachingGate {
        &self.gate
    }

    pub fn inspect(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            scored_count: self.scored_count,
            enhanced_analyzer: self.analyzers.enhanced_name().map(String::from),
            drift: self
                .smoothers
                .iter()
                .map(|(surface, smoother)| (*surface, smoother.values()))
                .collect(),
            history: self.history.clone(),
            gate: self.gate.clone(),
            last_output: self.last_output.clone(),
            last_coaching: self.last_coaching.clone(),
            debug: self.debug,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
