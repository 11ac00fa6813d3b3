mod countdown;
mod engine;
pub mod format;
mod phase_timer;
mod plan;

pub use countdown::{GetReady, GetReadyTick};
pub use engine::{Phase, Terminal, WorkoutEngine, WorkoutState};
pub use phase_timer::{PhaseTimer, DEFAULT_TICK_MS};
pub use plan::WorkoutPlan;
