pub mod config;
pub mod plan;
pub mod run;
pub mod simulate;

use clap::Args;
use runmate_core::{Config, WorkoutError, WorkoutPlan};

/// Plan overrides shared by `run`, `simulate` and `plan`.
///
/// Anything not given on the command line comes from the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Warm-up length in seconds (0 disables the warm-up)
    #[arg(long = "warm-up", value_name = "SECS")]
    pub warm_up: Option<u64>,
    /// High intensity length in seconds
    #[arg(long, value_name = "SECS")]
    pub high: Option<u64>,
    /// Low intensity length in seconds
    #[arg(long, value_name = "SECS")]
    pub low: Option<u64>,
    /// Number of high/low intervals
    #[arg(long)]
    pub intervals: Option<u32>,
}

impl PlanArgs {
    /// The settings plan with command-line overrides applied, validated.
    pub fn resolve(&self, config: &Config) -> Result<WorkoutPlan, WorkoutError> {
        let mut config = config.clone();
        let workout = &mut config.workout;
        if let Some(secs) = self.warm_up {
            workout.warm_up_secs = secs;
        }
        if let Some(secs) = self.high {
            workout.high_intensity_secs = secs;
        }
        if let Some(secs) = self.low {
            workout.low_intensity_secs = secs;
        }
        if let Some(count) = self.intervals {
            workout.intervals = count;
        }
        config.plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence() {
        let args = PlanArgs {
            warm_up: Some(0),
            intervals: Some(2),
            ..Default::default()
        };
        let plan = args.resolve(&Config::default()).unwrap();
        assert_eq!(plan, WorkoutPlan::from_secs(0, 100, 80, 2));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = PlanArgs {
            low: Some(0),
            ..Default::default()
        };
        assert!(args.resolve(&Config::default()).is_err());
    }

    #[test]
    fn invalid_setting_is_rejected_without_override() {
        let mut config = Config::default();
        config.workout.intervals = 0;
        assert_eq!(
            PlanArgs::default().resolve(&config).unwrap_err(),
            WorkoutError::InvalidDuration {
                field: "intervals",
                value: 0
            }
        );

        let args = PlanArgs {
            intervals: Some(3),
            ..Default::default()
        };
        assert_eq!(args.resolve(&config).unwrap().intervals, 3);
    }
}
