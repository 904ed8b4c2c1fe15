//! Coalescing timer for layout refreshes during a drag.

use std::time::{Duration, Instant};

/// Delay between a drag move and the layout refresh it schedules.
pub const LAYOUT_DEBOUNCE: Duration = Duration::from_millis(25);

/// One-shot timer. Arming an armed timer keeps the earlier deadline, so a
/// burst of moves produces one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutTimer {
    deadline: Option<Instant>,
}

impl LayoutTimer {
    pub fn arm(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + LAYOUT_DEBOUNCE);
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return true once the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
