//! Rolling prompt history for the coaching pattern layer
//!
//! - Word count EMA: first prompt seeds it, then 0.9 * prev + 0.1 * current
//! - Send times kept for a trailing 60 s window
//! - 3+ sends in the window = rapid-fire

use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::types::CoachingState;
use crate::{RAPID_FIRE_MIN_SENDS, RAPID_FIRE_WINDOW_MS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptHistory {
    /// Exponential moving average of prompt word count
    pub avg_prompt_len: f64,
    pub rapid_fire: bool,
    /// Send times (ms) within the trailing window, oldest first
    pub prompt_timestamps: VecDeque<i64>,
    pub last_state: CoachingState,
}

impl PromptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sent prompt into the history
    pub fn record(&mut self, word_count: usize, state: CoachingState, now_ms: i64) {
        let wc = word_count as f64;
        self.avg_prompt_len = if self.avg_prompt_len == 0.0 {
            wc
        } else {
            0.9 * self.avg_prompt_len + 0.1 * wc
        };

        self.prompt_timestamps.push_back(now_ms);
        self.prune(now_ms);
        self.rapid_fire = self.prompt_timestamps.len() >= RAPID_FIRE_MIN_SENDS;
        self.last_state = state;
    }

    /// Drop send times older than the window
    fn prune(&mut self, now_ms: i64) {
        while let Some(&front) = self.prompt_timestamps.front() {
            if now_ms.saturating_sub(front) > RAPID_FIRE_WINDOW_MS {
                self.prompt_timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Sends currently inside the window
    pub fn sends_in_window(&self) -> usize {
        self.prompt_timestamps.len()
    }
}
