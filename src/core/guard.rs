//! In-flight guard: at most one scoring pass per session at a time
//!
//! The ticket clears the flag on drop, including on early return or panic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when a pass is already running
    pub fn try_begin(&self) -> Option<InFlightTicket> {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightTicket {
                flag: Arc::clone(&self.flag),
            })
    }
}

/// Held for the duration of one pass
#[derive(Debug)]
pub struct InFlightTicket {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
