//! Temporal drift smoother
//!
//! Bounded FIFO of recent values. Output = 50/50 blend of the current value
//! and a decay-weighted average of history (newest weight 1, then 0.85, 0.85², ...).
//! One smoother per visual surface; never shared between surfaces.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DriftConfig;
use crate::{DRIFT_DECAY, HRI_DEFAULT};

/// Independent visual surfaces that each smooth the signal on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSurface {
    /// Floating HUD meter
    Hud,
    /// Canvas glyph animation
    Glyph,
}

impl DriftSurface {
    pub const ALL: [DriftSurface; 2] = [DriftSurface::Hud, DriftSurface::Glyph];
}

#[derive(Debug, Clone)]
pub struct DriftSmoother {
    buffer: VecDeque<f64>,
    capacity: usize,
    decay: f64,
}

impl Default for DriftSmoother {
    fn default() -> Self {
        Self::new(DriftConfig::default())
    }
}

impl DriftSmoother {
    pub fn new(config: DriftConfig) -> Self {
        let capacity = config.capacity.max(1);
        let decay = if config.decay.is_finite() && config.decay > 0.0 {
            config.decay.min(1.0)
        } else {
            DRIFT_DECAY
        };
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            decay,
        }
    }

    /// Append a value clamped to [0, 1], evicting the oldest at capacity
    pub fn push_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        while self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Smoothed value for `current`; records `current` afterwards
    pub fn compute_drifted(&mut self, current: f64) -> f64 {
        if !current.is_finite() {
            return self.buffer.back().copied().unwrap_or(HRI_DEFAULT);
        }
        let current = current.clamp(0.0, 1.0);

        if self.buffer.is_empty() {
            self.push_value(current);
            return current;
        }

        let mut weight = 1.0;
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for value in self.buffer.iter().rev() {
            weighted_sum += value * weight;
            weight_total += weight;
            weight *= self.decay;
        }

        let historical = weighted_sum / weight_total;
        let drifted = (historical + current) / 2.0;

        self.push_value(current);
        drifted
    }

    /// Forget all history (conversation change, tab reset)
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn values(&self) -> Vec<f64> {
        self.buffer.iter().copied().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_unchanged() {
        let mut smoother = DriftSmoother::default();
        assert_eq!(smoother.compute_drifted(0.15), 0.15);
        assert_eq!(smoother.len(), 1);
    }

    #[test]
    fn test_blend_with_history() {
        let mut smoother = DriftSmoother::default();
        smoother.compute_drifted(0.0);
        // history avg 0.0, current 1.0 → 0.5
        assert!((smoother.compute_drifted(1.0) - 0.5).abs() < 1e-12);
        // history [0.0, 1.0]: (1.0*1 + 0.0*0.85) / 1.85
        let expected = (1.0 / 1.85 + 1.0) / 2.0;
        assert!((smoother.compute_drifted(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut smoother = DriftSmoother::default();
        for i in 0..25 {
            smoother.push_value(i as f64 / 25.0);
        }
        assert_eq!(smoother.len(), 10);
        assert_eq!(smoother.values()[0], 15.0 / 25.0);
    }

    #[test]
    fn test_converges_to_constant() {
        let mut smoother = DriftSmoother::default();
        for _ in 0..5 {
            smoother.compute_drifted(0.0);
        }
        let mut last = 0.0;
        for _ in 0..30 {
            last = smoother.compute_drifted(0.8);
        }
        assert!((last - 0.8).abs() < 1e-9, "got {}", last);
    }

    #[test]
    fn test_clear() {
        let mut smoother = DriftSmoother::default();
        smoother.compute_drifted(0.3);
        smoother.compute_drifted(0.9);
        smoother.clear();
        assert!(smoother.is_empty());
        assert_eq!(smoother.compute_drifted(0.7), 0.7);
    }

    #[test]
    fn test_non_finite_is_ignored() {
        let mut smoother = DriftSmoother::default();
        assert_eq!(smoother.compute_drifted(f64::NAN), HRI_DEFAULT);
        assert!(smoother.is_empty());
        smoother.compute_drifted(0.2);
        assert_eq!(smoother.compute_drifted(f64::NAN), 0.2);
        assert_eq!(smoother.len(), 1);
    }

    #[test]
    fn test_out_of_range_input_clamped() {
        let mut smoother = DriftSmoother::default();
        assert_eq!(smoother.compute_drifted(5.0), 1.0);
        assert_eq!(smoother.compute_drifted(0.5), 0.75);
        smoother.push_value(-3.0);
        assert_eq!(smoother.values(), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_invalid_decay_falls_back_to_default() {
        for decay in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut smoother = DriftSmoother::new(DriftConfig { capacity: 10, decay });
            smoother.compute_drifted(0.3);
            let drifted = smoother.compute_drifted(0.3);
            assert!((drifted - 0.3).abs() < 1e-12, "decay {}: {}", decay, drifted);
            assert!(smoother.compute_drifted(0.9).is_finite());
        }
    }

    #[test]
    fn test_surfaces_are_independent() {
        let mut hud = DriftSmoother::default();
        let mut glyph = DriftSmoother::default();
        hud.compute_drifted(0.1);
        assert_eq!(glyph.compute_drifted(0.9), 0.9);
        assert_eq!(hud.len(), 1);
    }
}
