//! Collaborators injected into the workout engine.
//!
//! The engine never talks to the platform directly. Haptics, sounds and the
//! live status display are reached through [`WorkoutCues`], and wall-clock
//! time through [`Clock`], so tests can drive everything deterministically.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PublishError;
use crate::live_status::LiveStatus;

/// Vibration cue played on phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Haptic {
    WarmUp,
    HighIntensity,
    LowIntensity,
    Completion,
}

/// Sound cue played on phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Warm-up begins.
    Ding,
    /// High intensity begins.
    Start,
    /// Low intensity begins.
    Gong,
    Complete,
}

/// Capability set handed to the engine at construction.
pub trait WorkoutCues {
    /// Push a status record to the external live display.
    ///
    /// Fire-and-forget: an error is logged by the engine and otherwise
    /// ignored.
    fn publish_status(&mut self, status: &LiveStatus) -> Result<(), PublishError>;

    fn play_haptic(&mut self, haptic: Haptic);

    fn play_tone(&mut self, tone: Tone);
}

/// Cues that do nothing. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCues;

impl WorkoutCues for NoopCues {
    fn publish_status(&mut self, _status: &LiveStatus) -> Result<(), PublishError> {
        Ok(())
    }

    fn play_haptic(&mut self, _haptic: Haptic) {}

    fn play_tone(&mut self, _tone: Tone) {}
}

/// Source of wall-clock timestamps for events and end-time estimates.
///
/// Only used to stamp output; durations are driven by `tick()`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clock that runs `speed` times faster than `base`, starting from the
/// instant it was created.
///
/// Used when the driver feeds `speed * tick` of workout time per real tick,
/// so event timestamps and end-time estimates stay on the same timeline as
/// the countdown.
#[derive(Debug, Clone)]
pub struct ScaledClock<C: Clock = SystemClock> {
    base: C,
    origin: DateTime<Utc>,
    speed: f64,
}

impl<C: Clock> ScaledClock<C> {
    pub fn new(base: C, speed: f64) -> Self {
        let origin = base.now();
        Self {
            base,
            origin,
            speed,
        }
    }
}

impl<C: Clock> Clock for ScaledClock<C> {
    fn now(&self) -> DateTime<Utc> {
        let elapsed_ms = (self.base.now() - self.origin).num_milliseconds() as f64;
        let scaled_ms = (elapsed_ms * self.speed).round();
        // `as` saturates for out-of-range floats.
        TimeDelta::try_milliseconds(scaled_ms as i64)
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let other = clock.clone();
        clock.advance_ms(1_500);
        assert_eq!(other.now(), start + Duration::milliseconds(1_500));
    }

    #[test]
    fn scaled_clock_runs_faster_than_base() {
        let start = Utc::now();
        let base = ManualClock::new(start);
        let clock = ScaledClock::new(base.clone(), 100.0);
        assert_eq!(clock.now(), start);

        base.advance_ms(360);
        assert_eq!(clock.now(), start + Duration::milliseconds(36_000));
    }

    #[test]
    fn unit_speed_matches_base() {
        let base = ManualClock::new(Utc::now());
        let clock = ScaledClock::new(base.clone(), 1.0);
        base.advance_ms(1_234);
        assert_eq!(clock.now(), base.now());
    }
}
