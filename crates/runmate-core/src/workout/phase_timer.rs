//! Countdown primitive for a single workout phase.
//!
//! The timer never reads the clock. The owner feeds it elapsed time through
//! `tick()`, so paused wall-clock time simply never arrives.

use serde::{Deserialize, Serialize};

use super::format::ceil_secs;
use crate::error::WorkoutError;

/// Tick resolution used by the drivers, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimer {
    duration_ms: u64,
    remaining_ms: u64,
    running: bool,
    /// Set once completion has been reported for the current start.
    fired: bool,
}

impl PhaseTimer {
    /// Create a running timer for `duration_ms`.
    pub fn start(duration_ms: u64) -> Result<Self, WorkoutError> {
        let mut timer = Self {
            duration_ms: 0,
            remaining_ms: 0,
            running: false,
            fired: false,
        };
        timer.restart(duration_ms)?;
        Ok(timer)
    }

    /// Reset to a fresh, running countdown of `duration_ms`.
    pub fn restart(&mut self, duration_ms: u64) -> Result<(), WorkoutError> {
        if duration_ms == 0 {
            return Err(WorkoutError::InvalidDuration {
                field: "phase",
                value: duration_ms,
            });
        }
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.running = true;
        self.fired = false;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Remaining time rounded up to whole seconds, for display.
    pub fn display_secs(&self) -> u64 {
        ceil_secs(self.remaining_ms)
    }

    /// 0.0 .. 1.0 progress within this phase.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.duration_ms as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by `delta_ms`. Returns `true` on the tick that reaches zero,
    /// and never again until the next `restart`.
    ///
    /// Time beyond what remains is discarded.
    pub fn tick(&mut self, delta_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        if self.remaining_ms == 0 {
            self.running = false;
            if !self.fired {
                self.fired = true;
                return true;
            }
        }
        false
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if self.remaining_ms > 0 {
            self.running = true;
        }
    }
}
