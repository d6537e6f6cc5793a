//! Tone classifier: dominant category from lexicon hits
//!
//! - Highest hit count wins
//! - Ties go to the earlier category in `ToneCategory::PRIORITY`
//! - No hits at all → calm

use crate::types::{ToneCategory, ToneHits};

/// Pick the dominant tone. Never fails.
pub fn classify(hits: &ToneHits) -> ToneCategory {
    let mut best = ToneCategory::default();
    let mut best_hits = 0;

    for tone in ToneCategory::PRIORITY {
        let count = hits.get(tone);
        if count > best_hits {
            best = tone;
            best_hits = count;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hits_is_calm() {
        assert_eq!(classify(&ToneHits::zero()), ToneCategory::Calm);
    }

    #[test]
    fn test_max_wins() {
        let hits = ToneHits { reflective: 3, urgent: 1, ..ToneHits::zero() };
        assert_eq!(classify(&hits), ToneCategory::Reflective);
    }

    #[test]
    fn test_tie_break_order() {
        let hits = ToneHits { resonant: 2, dissonant: 2, calm: 2, ..ToneHits::zero() };
        assert_eq!(classify(&hits), ToneCategory::Dissonant);

        let hits = ToneHits { urgent: 1, calm: 1, ..ToneHits::zero() };
        assert_eq!(classify(&hits), ToneCategory::Urgent);

        let hits = ToneHits { reflective: 1, calm: 1, ..ToneHits::zero() };
        assert_eq!(classify(&hits), ToneCategory::Reflective);
    }

    #[test]
    fn test_calm_only() {
        let hits = ToneHits { calm: 4, ..ToneHits::zero() };
        assert_eq!(classify(&hits), ToneCategory::Calm);
    }
}
