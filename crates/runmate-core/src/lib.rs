//! # RunMate Core Library
//!
//! Core logic for the RunMate interval running trainer: an optional
//! warm-up, N cycles of high and low intensity, then completion. The CLI
//! binary and any other front end are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Workout Engine**: A clock-agnostic state machine that requires the
//!   caller to periodically invoke `tick(delta_ms)`
//! - **Live Status**: One-way feed for an external countdown display
//! - **Cues**: Injected haptics, tones, status publisher and clock
//! - **Storage**: TOML-based settings
//!
//! ## Key Components
//!
//! - [`WorkoutEngine`]: Core workout state machine
//! - [`PhaseTimer`]: Countdown for a single phase
//! - [`WorkoutPlan`]: Durations for one run
//! - [`Config`]: Application configuration management

pub mod cues;
pub mod error;
pub mod events;
pub mod live_status;
pub mod storage;
pub mod workout;

pub use cues::{
    Clock, Haptic, ManualClock, NoopCues, ScaledClock, SystemClock, Tone, WorkoutCues,
};
pub use error::{ConfigError, PublishError, WorkoutError};
pub use events::Event;
pub use live_status::LiveStatus;
pub use storage::Config;
pub use workout::{
    GetReady, GetReadyTick, Phase, PhaseTimer, Terminal, WorkoutEngine, WorkoutPlan, WorkoutState,
    DEFAULT_TICK_MS,
};
