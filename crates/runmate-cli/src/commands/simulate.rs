use clap::Args;
use runmate_core::{Config, NoopCues, WorkoutCues, WorkoutEngine, DEFAULT_TICK_MS};

use super::PlanArgs;
use crate::cues::TerminalCues;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Workout time advanced per synthetic tick
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
    /// Also print every live status record
    #[arg(long)]
    pub status: bool,
}

/// Run a whole workout with synthetic ticks and print every event as a JSON
/// line. Nothing sleeps.
pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.tick_ms == 0 {
        return Err("tick-ms must be greater than zero".into());
    }
    let config = Config::load()?;
    let plan = args.plan.resolve(&config)?;

    if args.status {
        let cues = TerminalCues {
            echo_status: true,
            ..Default::default()
        };
        simulate(WorkoutEngine::new(cues), &config, plan, args.tick_ms)
    } else {
        simulate(WorkoutEngine::new(NoopCues), &config, plan, args.tick_ms)
    }
}

fn simulate<H: WorkoutCues>(
    engine: WorkoutEngine<H>,
    config: &Config,
    plan: runmate_core::WorkoutPlan,
    tick_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = engine.with_publish_interval(config.engine.publish_interval_ms);
    let started = engine.start_with(plan)?;
    println!("{}", serde_json::to_string(&started)?);

    loop {
        if let Some(event) = engine.tick(tick_ms)? {
            println!("{}", serde_json::to_string(&event)?);
            if event.is_terminal() {
                return Ok(());
            }
        }
    }
}
