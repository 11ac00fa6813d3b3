//! Live workout in the terminal.
//!
//! One `select!` loop owns the engine: fixed-rate ticks, stdin commands and
//! Ctrl-C all go through it, so a command always lands between two ticks.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use runmate_core::workout::format::format_clock;
use runmate_core::{
    Config, Event, GetReady, GetReadyTick, ScaledClock, SystemClock, Terminal, WorkoutEngine,
    WorkoutError, WorkoutState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::PlanArgs;
use crate::cues::TerminalCues;

/// Engine driven by the terminal. Its clock runs at `--speed` so timestamps
/// and end-time estimates match the accelerated countdown.
type LiveEngine = WorkoutEngine<TerminalCues, ScaledClock<SystemClock>>;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Play the workout faster than real time (e.g. 10 = ten times faster)
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,
    /// Skip the "get ready" countdown
    #[arg(long)]
    pub no_countdown: bool,
    /// Print events as JSON lines instead of a countdown display
    #[arg(long)]
    pub json: bool,
    /// Mirror the live status record into this file
    #[arg(long, value_name = "PATH")]
    pub status_file: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(args.speed.is_finite() && args.speed > 0.0) {
        return Err(format!("speed must be a positive number, got {}", args.speed).into());
    }
    let config = Config::load()?;
    let plan = args.plan.resolve(&config)?;

    let cues = TerminalCues {
        sound: config.cues.sound,
        haptics: config.cues.haptics,
        echo_status: false,
        status_file: args.status_file.clone(),
    };
    let clock = ScaledClock::new(SystemClock, args.speed);
    let mut engine = WorkoutEngine::with_clock(cues, clock)
        .with_publish_interval(config.engine.publish_interval_ms);
    engine.configure(plan)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let terminal = runtime.block_on(drive(&mut engine, &config, &args))?;

    match (terminal, args.json) {
        (_, true) => {}
        (Terminal::Completed, false) => println!("\nRun completed! YOU DID IT!"),
        (Terminal::Cancelled, false) => println!("\nRun cancelled."),
    }
    Ok(())
}

async fn drive(
    engine: &mut LiveEngine,
    config: &Config,
    args: &RunArgs,
) -> Result<Terminal, Box<dyn std::error::Error>> {
    let tick_ms = config.engine.tick_ms.max(1);
    // Workout time covered by one tick of the real clock.
    let delta_ms = ((tick_ms as f64) * args.speed).round().max(1.0) as u64;

    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let countdown_secs = if args.no_countdown { 0 } else { config.engine.countdown_secs };
    get_ready(&mut ticker, countdown_secs, delta_ms, args.json).await;

    emit(&engine.start()?, args.json)?;
    if !args.json {
        println!("Commands: p = pause, r = resume, q = cancel");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut confirm: Option<CancelPrompt> = None;
    let mut last_display = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = engine.tick(delta_ms)? {
                    emit(&event, args.json)?;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(cmd) => handle_command(engine, &mut confirm, cmd.trim(), args.json)?,
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                if let Some(event) = engine.cancel() {
                    emit(&event, args.json)?;
                }
            }
        }

        if let Some(terminal) = engine.terminal() {
            return Ok(terminal);
        }
        if !args.json {
            let display = render(engine);
            if display != last_display {
                print!("\r{display}");
                std::io::stdout().flush()?;
                last_display = display;
            }
        }
    }
}

async fn get_ready(ticker: &mut tokio::time::Interval, secs: u64, delta_ms: u64, json: bool) {
    let mut countdown = GetReady::new(secs);
    let mut shown = countdown.showing();
    if let (Some(n), false) = (shown, json) {
        println!("Get ready... {n}");
    }
    while !countdown.is_done() {
        ticker.tick().await;
        match countdown.tick(delta_ms) {
            GetReadyTick::Showing(n) if Some(n) != shown => {
                shown = Some(n);
                if !json {
                    println!("{n}");
                }
            }
            GetReadyTick::Go if !json => println!("Go!"),
            _ => {}
        }
    }
}

/// Pending "cancel the run?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CancelPrompt {
    /// The prompt paused the run, so answering no resumes it.
    resume_on_no: bool,
}

fn handle_command(
    engine: &mut LiveEngine,
    confirm: &mut Option<CancelPrompt>,
    cmd: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(prompt) = confirm.take() {
        let outcome = match cmd {
            "y" | "yes" => Ok(engine.cancel()),
            _ if prompt.resume_on_no => engine.resume().map(Some),
            _ => Ok(None),
        };
        return report(outcome, json);
    }

    let outcome = match cmd {
        "p" | "pause" => engine.pause(),
        "r" | "resume" => engine.resume().map(Some),
        "" | "t" | "toggle" if engine.state() == WorkoutState::Paused => engine.resume().map(Some),
        "" | "t" | "toggle" => engine.pause(),
        "q" | "quit" | "c" | "cancel" => {
            let resume_on_no = engine.state() == WorkoutState::Running;
            let paused = engine.pause();
            let ask = paused.is_ok();
            report(paused, json)?;
            if ask {
                *confirm = Some(CancelPrompt { resume_on_no });
                eprintln!("Cancel the run? (y/n)");
            }
            return Ok(());
        }
        other => {
            eprintln!("\nunknown command: {other} (p, r, q)");
            return Ok(());
        }
    };
    report(outcome, json)
}

fn report(
    outcome: Result<Option<Event>, WorkoutError>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(Some(event)) => emit(&event, json),
        Ok(None) => Ok(()),
        // Rejected commands are shown; the run keeps going.
        Err(e) => {
            eprintln!("\nerror: {e}");
            Ok(())
        }
    }
}

fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::WorkoutStarted { total_ms, .. } => {
            println!("Workout started, {} total", format_clock(*total_ms))
        }
        Event::PhaseStarted { phase, interval, .. } => {
            println!("\n>> {} ({interval})", phase.label())
        }
        Event::WorkoutPaused { .. } => println!("\nPaused. r to resume, q to quit"),
        Event::WorkoutResumed { .. } => println!("Resumed"),
        Event::WorkoutCompleted { .. } | Event::WorkoutCancelled { .. } => {}
        Event::StateSnapshot { .. } => println!("{}", serde_json::to_string_pretty(event)?),
    }
    Ok(())
}

fn render(engine: &LiveEngine) -> String {
    const BAR: usize = 10;
    let filled = ((engine.phase_progress() * BAR as f64) as usize).min(BAR);
    let paused = if engine.is_paused() { "  [paused]" } else { "" };
    format!(
        "{:<15} {} of {}  {} [{}{}]  (total {}, {:>3.0}%){paused}",
        engine.phase().label(),
        engine.current_interval(),
        engine.intervals(),
        format_clock(engine.remaining_in_phase_ms()),
        "#".repeat(filled),
        "-".repeat(BAR - filled),
        format_clock(engine.total_time_remaining_ms()),
        engine.progress() * 100.0,
    )
}
