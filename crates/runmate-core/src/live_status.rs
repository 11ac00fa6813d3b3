//! Status record mirrored to the external live display (lock screen widget).
//!
//! The display counts down on its own from `end_time_estimate`, so the engine
//! only needs to send a fresh record when something the display can't infer
//! changes: a phase transition, pause, resume, completion or cancellation.
//! Progress updates during a phase are throttled.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a tick update stays fresh before the display should grey it out.
pub const STALE_AFTER_MS: i64 = 30_000;

/// Default minimum workout time between two tick-driven updates.
pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStatus {
    /// When the workout will end if nothing changes. `None` while paused.
    pub end_time_estimate: Option<DateTime<Utc>>,
    /// 0.0 ..= 1.0 across the whole workout.
    pub progress: f64,
    pub is_complete: bool,
    pub is_paused: bool,
    /// User ended the workout early. Never set together with `is_complete`.
    #[serde(default)]
    pub is_cancelled: bool,
    /// Total time remaining captured when paused. Only meaningful if
    /// `is_paused`.
    pub frozen_remaining_ms: u64,
    /// After this instant the record should be treated as stale.
    #[serde(default)]
    pub stale_at: Option<DateTime<Utc>>,
}

impl LiveStatus {
    /// Mark a routine progress update as going stale after
    /// [`STALE_AFTER_MS`].
    pub fn stale_from(mut self, now: DateTime<Utc>) -> Self {
        self.stale_at = Some(now + Duration::milliseconds(STALE_AFTER_MS));
        self
    }

    /// Countdown the display should show at `now`.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        if self.is_paused {
            return self.frozen_remaining_ms;
        }
        match self.end_time_estimate {
            Some(end) => (end - now).num_milliseconds().max(0) as u64,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(end: DateTime<Utc>) -> LiveStatus {
        LiveStatus {
            end_time_estimate: Some(end),
            progress: 0.5,
            is_complete: false,
            is_paused: false,
            is_cancelled: false,
            frozen_remaining_ms: 0,
            stale_at: None,
        }
    }

    #[test]
    fn remaining_counts_down_to_end_time() {
        let now = Utc::now();
        let status = running(now + Duration::seconds(90));
        assert_eq!(status.remaining_at(now), 90_000);
        assert_eq!(status.remaining_at(now + Duration::seconds(100)), 0);
    }

    #[test]
    fn paused_status_shows_frozen_value() {
        let now = Utc::now();
        let status = LiveStatus {
            end_time_estimate: None,
            is_paused: true,
            frozen_remaining_ms: 42_000,
            ..running(now)
        };
        assert_eq!(status.remaining_at(now + Duration::hours(1)), 42_000);
    }

    #[test]
    fn stale_from_sets_deadline() {
        let now = Utc::now();
        let status = running(now).stale_from(now);
        assert_eq!(status.stale_at, Some(now + Duration::seconds(30)));
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let now = Utc::now();
        let json = serde_json::to_value(running(now)).unwrap();
        assert!(json.get("end_time_estimate").is_some());
        assert_eq!(json["is_cancelled"], serde_json::Value::Bool(false));
    }
}
