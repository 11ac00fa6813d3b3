use serde::{Deserialize, Serialize};

use crate::error::WorkoutError;

/// Durations for one interval run.
///
/// Immutable for the lifetime of a run; the engine reads it once at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Warm-up length in milliseconds. Zero disables the warm-up.
    pub warm_up_ms: u64,
    pub high_intensity_ms: u64,
    pub low_intensity_ms: u64,
    /// Number of high/low cycles.
    pub intervals: u32,
}

impl WorkoutPlan {
    pub fn new(warm_up_ms: u64, high_intensity_ms: u64, low_intensity_ms: u64, intervals: u32) -> Self {
        Self {
            warm_up_ms,
            high_intensity_ms,
            low_intensity_ms,
            intervals,
        }
    }

    /// Build a plan from whole seconds.
    ///
    /// Uses saturating arithmetic so absurd settings can't overflow.
    pub fn from_secs(warm_up_secs: u64, high_secs: u64, low_secs: u64, intervals: u32) -> Self {
        Self::new(
            warm_up_secs.saturating_mul(1000),
            high_secs.saturating_mul(1000),
            low_secs.saturating_mul(1000),
            intervals,
        )
    }

    /// Reject plans that can't be run. Never clamps.
    pub fn validate(&self) -> Result<(), WorkoutError> {
        if self.high_intensity_ms == 0 {
            return Err(WorkoutError::InvalidDuration {
                field: "high_intensity",
                value: 0,
            });
        }
        if self.low_intensity_ms == 0 {
            return Err(WorkoutError::InvalidDuration {
                field: "low_intensity",
                value: 0,
            });
        }
        if self.intervals == 0 {
            return Err(WorkoutError::InvalidDuration {
                field: "intervals",
                value: 0,
            });
        }
        Ok(())
    }

    pub fn has_warm_up(&self) -> bool {
        self.warm_up_ms > 0
    }

    /// One high plus one low phase.
    pub fn interval_ms(&self) -> u64 {
        self.high_intensity_ms.saturating_add(self.low_intensity_ms)
    }

    /// Length of all intervals, without the warm-up.
    pub fn intervals_total_ms(&self) -> u64 {
        self.interval_ms().saturating_mul(u64::from(self.intervals))
    }

    /// Whole workout: warm-up plus every interval.
    pub fn total_ms(&self) -> u64 {
        self.warm_up_ms.saturating_add(self.intervals_total_ms())
    }

    /// Run length in whole minutes (truncated), as shown by the settings
    /// editor. The warm-up is not counted.
    pub fn run_minutes(&self) -> u64 {
        self.intervals_total_ms() / 60_000
    }
}

impl Default for WorkoutPlan {
    fn default() -> Self {
        Self::from_secs(30, 100, 80, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_includes_warm_up() {
        let plan = WorkoutPlan::from_secs(30, 100, 80, 2);
        assert_eq!(plan.total_ms(), 30_000 + 2 * 180_000);
        assert_eq!(plan.intervals_total_ms(), 360_000);
    }

    #[test]
    fn default_plan_matches_app_defaults() {
        let plan = WorkoutPlan::default();
        assert_eq!(plan.warm_up_ms, 30_000);
        assert_eq!(plan.intervals, 10);
        assert_eq!(plan.run_minutes(), 30);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn zero_warm_up_is_valid() {
        let plan = WorkoutPlan::from_secs(0, 100, 80, 2);
        assert!(!plan.has_warm_up());
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn validate_names_the_bad_field() {
        let err = WorkoutPlan::from_secs(0, 0, 80, 2).validate().unwrap_err();
        assert_eq!(
            err,
            WorkoutError::InvalidDuration {
                field: "high_intensity",
                value: 0
            }
        );

        let err = WorkoutPlan::from_secs(0, 100, 0, 2).validate().unwrap_err();
        assert!(matches!(err, WorkoutError::InvalidDuration { field: "low_intensity", .. }));

        let err = WorkoutPlan::from_secs(0, 100, 80, 0).validate().unwrap_err();
        assert!(matches!(err, WorkoutError::InvalidDuration { field: "intervals", .. }));
    }

    #[test]
    fn zero_intervals_message_has_no_unit() {
        let err = WorkoutPlan::from_secs(0, 100, 80, 0).validate().unwrap_err();
        assert_eq!(
            err,
            WorkoutError::InvalidDuration {
                field: "intervals",
                value: 0
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid duration for 'intervals': 0 (must be greater than zero)"
        );
    }

    #[test]
    fn huge_values_saturate() {
        let plan = WorkoutPlan::new(u64::MAX, u64::MAX, 1, u32::MAX);
        assert_eq!(plan.total_ms(), u64::MAX);
    }
}
