//! "Get ready" countdown shown before the first phase.

use super::phase_timer::PhaseTimer;

/// What the countdown screen should show after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetReadyTick {
    /// Still counting; the number to display.
    Showing(u64),
    /// Countdown reached zero on this tick.
    Go,
    /// Already finished (or never configured).
    Done,
}

#[derive(Debug, Clone)]
pub struct GetReady {
    timer: Option<PhaseTimer>,
}

impl GetReady {
    /// A countdown of `secs` seconds. Zero means no countdown at all.
    pub fn new(secs: u64) -> Self {
        let timer = PhaseTimer::start(secs.saturating_mul(1000)).ok();
        Self { timer }
    }

    /// Number currently on screen, or `None` once finished.
    pub fn showing(&self) -> Option<u64> {
        self.timer
            .as_ref()
            .filter(|t| !t.is_finished())
            .map(PhaseTimer::display_secs)
    }

    pub fn is_done(&self) -> bool {
        self.showing().is_none()
    }

    pub fn tick(&mut self, delta_ms: u64) -> GetReadyTick {
        let Some(timer) = self.timer.as_mut() else {
            return GetReadyTick::Done;
        };
        if timer.tick(delta_ms) {
            return GetReadyTick::Go;
        }
        if timer.is_finished() {
            GetReadyTick::Done
        } else {
            GetReadyTick::Showing(timer.display_secs())
        }
    }
}
