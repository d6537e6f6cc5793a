//! Pluggable scorer strategy
//!
//! The keyword path is always available. An enhanced analyzer, when installed,
//! is tried first; an error, a panic, an out-of-range result or a result
//! arriving after the deadline all fall back to keywords.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::core::hri::ResonanceScorer;
use crate::core::lexicon::LexiconTable;
use crate::error::HugoResult;
use crate::types::ScoredText;
use crate::ANALYZER_DEADLINE_MS;

/// Anything that can turn text into a `ScoredText`
pub trait ToneAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    fn score_text(&self, text: &str, timestamp: i64) -> HugoResult<ScoredText>;
}

/// Deterministic lexicon path. Never fails.
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalyzer {
    scorer: ResonanceScorer,
}

impl KeywordAnalyzer {
    pub fn new(table: Arc<LexiconTable>) -> Self {
        Self {
            scorer: ResonanceScorer::new(table),
        }
    }

    pub fn score(&self, text: &str, timestamp: i64) -> ScoredText {
        let reading = self.scorer.evaluate(text);
        ScoredText::new(text, reading.tone, reading.hri, timestamp)
    }
}

impl ToneAnalyzer for KeywordAnalyzer {
    fn name(&self) -> &str {
        "keyword"
    }

    fn score_text(&self, text: &str, timestamp: i64) -> HugoResult<ScoredText> {
        Ok(self.score(text, timestamp))
    }
}

/// Enhanced analyzer (optional) in front of the keyword fallback
pub struct AnalyzerChain {
    enhanced: Option<Box<dyn ToneAnalyzer>>,
    fallback: KeywordAnalyzer,
    deadline: Duration,
}

impl std::fmt::Debug for AnalyzerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerChain")
            .field("enhanced", &self.enhanced.as_ref().map(|a| a.name().to_string()))
            .field("fallback", &self.fallback)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Default for AnalyzerChain {
    fn default() -> Self {
        Self::new(KeywordAnalyzer::default())
    }
}

impl AnalyzerChain {
    pub fn new(fallback: KeywordAnalyzer) -> Self {
        Self {
            enhanced: None,
            fallback,
            deadline: Duration::from_millis(ANALYZER_DEADLINE_MS),
        }
    }

    pub fn with_enhanced(mut self, analyzer: Box<dyn ToneAnalyzer>) -> Self {
        self.enhanced = Some(analyzer);
        self
    }

    /// Enhanced results slower than this are discarded
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn enhanced_name(&self) -> Option<&str> {
        self.enhanced.as_deref().map(|a| a.name())
    }

    /// Always yields a valid `ScoredText`
    pub fn score_text(&self, text: &str, timestamp: i64) -> ScoredText {
        if let Some(enhanced) = &self.enhanced {
            if let Some(scored) = self.try_enhanced(enhanced.as_ref(), text, timestamp) {
                return scored;
            }
        }
        self.fallback.score(text, timestamp)
    }

    fn try_enhanced(&self, enhanced: &dyn ToneAnalyzer, text: &str, timestamp: i64) -> Option<ScoredText> {
        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| enhanced.score_text(text, timestamp)));
        let elapsed = started.elapsed();

        match result {
            Err(_) => {
                warn!("{} analyzer panicked; using keyword path", enhanced.name());
                None
            }
            Ok(Err(e)) => {
                warn!("{} analyzer failed: {}; using keyword path", enhanced.name(), e);
                None
            }
            Ok(Ok(_)) if elapsed > self.deadline => {
                warn!(
                    "{} analyzer took {:?} (deadline {:?}); using keyword path",
                    enhanced.name(),
                    elapsed,
                    self.deadline
                );
                None
            }
            Ok(Ok(scored)) if scored.hri.is_finite() && (0.0..=1.0).contains(&scored.hri) => Some(scored),
            Ok(Ok(scored)) => {
                warn!(
                    "{} analyzer returned out-of-range hri {}; using keyword path",
                    enhanced.name(),
                    scored.hri
                );
                None
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HugoError;
    use crate::types::ToneCategory;

    struct Broken;

    impl ToneAnalyzer for Broken {
        fn name(&self) -> &str {
            "wasm"
        }
        fn score_text(&self, _text: &str, _timestamp: i64) -> HugoResult<ScoredText> {
            Err(HugoError::Analyzer("module not loaded".into()))
        }
    }

    struct Fixed(f64);

    impl ToneAnalyzer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn score_text(&self, text: &str, timestamp: i64) -> HugoResult<ScoredText> {
            Ok(ScoredText::new(text, ToneCategory::Reflective, self.0, timestamp))
        }
    }

    struct Trapping;

    impl ToneAnalyzer for Trapping {
        fn name(&self) -> &str {
            "wasm"
        }
        fn score_text(&self, _text: &str, _timestamp: i64) -> HugoResult<ScoredText> {
            panic!("wasm trap: unreachable");
        }
    }

    struct Slow(Duration);

    impl ToneAnalyzer for Slow {
        fn name(&self) -> &str {
            "slow"
        }
        fn score_text(&self, text: &str, timestamp: i64) -> HugoResult<ScoredText> {
            std::thread::sleep(self.0);
            Ok(ScoredText::new(text, ToneCategory::Reflective, 0.42, timestamp))
        }
    }

    #[test]
    fn test_keyword_only() {
        let chain = AnalyzerChain::default();
        let scored = chain.score_text("perfect amazing wonderful", 7);
        assert_eq!(scored.tone, ToneCategory::Resonant);
        assert_eq!(scored.timestamp, 7);
        assert!(chain.enhanced_name().is_none());
    }

    #[test]
    fn test_failure_falls_back() {
        let chain = AnalyzerChain::default().with_enhanced(Box::new(Broken));
        let scored = chain.score_text("urgent asap critical", 0);
        assert_eq!(scored.tone, ToneCategory::Urgent);
        assert_eq!(chain.enhanced_name(), Some("wasm"));
    }

    #[test]
    fn test_enhanced_result_used() {
        let chain = AnalyzerChain::default().with_enhanced(Box::new(Fixed(0.42)));
        let scored = chain.score_text("urgent asap critical", 0);
        assert_eq!(scored.tone, ToneCategory::Reflective);
        assert_eq!(scored.hri, 0.42);
    }

    #[test]
    fn test_panic_falls_back() {
        let chain = AnalyzerChain::default().with_enhanced(Box::new(Trapping));
        let scored = chain.score_text("perfect", 3);
        assert_eq!(scored.tone, ToneCategory::Resonant);
        assert_eq!(scored.timestamp, 3);
    }

    #[test]
    fn test_late_result_discarded() {
        let chain = AnalyzerChain::default()
            .with_enhanced(Box::new(Slow(Duration::from_millis(30))))
            .with_deadline(Duration::from_millis(5));
        let scored = chain.score_text("urgent asap critical", 0);
        assert_eq!(scored.tone, ToneCategory::Urgent);
    }

    #[test]
    fn test_result_within_deadline_used() {
        let chain = AnalyzerChain::default()
            .with_enhanced(Box::new(Slow(Duration::from_millis(1))))
            .with_deadline(Duration::from_secs(5));
        assert_eq!(chain.score_text("urgent asap critical", 0).hri, 0.42);
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let chain = AnalyzerChain::default().with_enhanced(Box::new(Fixed(f64::NAN)));
        let scored = chain.score_text("urgent asap critical", 0);
        assert_eq!(scored.tone, ToneCategory::Urgent);
        assert!((0.0..=1.0).contains(&scored.hri));
    }
}
