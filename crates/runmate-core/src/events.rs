use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workout::{Phase, WorkoutState};

/// Every state change in the workout engine produces an Event.
/// Front ends print or render them; nothing feeds them back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkoutStarted {
        phase: Phase,
        intervals: u32,
        total_ms: u64,
        end_time_estimate: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A new phase began after the previous one ran out.
    PhaseStarted {
        phase: Phase,
        interval: u32,
        duration_ms: u64,
        total_remaining_ms: u64,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        phase: Phase,
        remaining_in_phase_ms: u64,
        total_remaining_ms: u64,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        phase: Phase,
        remaining_in_phase_ms: u64,
        end_time_estimate: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        intervals: u32,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    /// Ended early by the user. Distinct from completion.
    WorkoutCancelled {
        phase: Phase,
        interval: u32,
        total_remaining_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: WorkoutState,
        phase: Phase,
        interval: u32,
        intervals: u32,
        remaining_in_phase_ms: u64,
        total_remaining_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event ends the workout.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::WorkoutCompleted { .. } | Event::WorkoutCancelled { .. }
        )
    }
}
