//! Workout engine implementation.
//!
//! The engine is a clock-agnostic state machine. It does not use internal
//! threads or read the wall clock to measure time - the caller drives it
//! with `tick(delta_ms)` from whatever scheduler it has.
//!
//! ## Phases
//!
//! ```text
//! WarmUp -> HighIntensity -> LowIntensity -> HighIntensity ... -> Complete
//! ```
//!
//! `WarmUp` is skipped when the plan has no warm-up. `LowIntensity` moves to
//! `Complete` after the last interval.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = WorkoutEngine::new(NoopCues);
//! engine.start_with(WorkoutPlan::default())?;
//! // In a loop:
//! engine.tick(DEFAULT_TICK_MS)?; // Returns Some(Event) on phase changes
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::phase_timer::PhaseTimer;
use super::plan::WorkoutPlan;
use crate::cues::{Clock, Haptic, SystemClock, Tone, WorkoutCues};
use crate::error::WorkoutError;
use crate::events::Event;
use crate::live_status::{LiveStatus, DEFAULT_PUBLISH_INTERVAL_MS};

/// One segment of the workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    WarmUp,
    HighIntensity,
    LowIntensity,
    Complete,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::WarmUp => "Warm-up",
            Phase::HighIntensity => "High intensity",
            Phase::LowIntensity => "Low intensity",
            Phase::Complete => "Complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutState {
    Idle,
    Running,
    Paused,
    Completed,
    /// Ended early by the user.
    Cancelled,
}

impl WorkoutState {
    /// Running or paused.
    pub fn is_active(&self) -> bool {
        matches!(self, WorkoutState::Running | WorkoutState::Paused)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkoutState::Completed | WorkoutState::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutState::Idle => "idle",
            WorkoutState::Running => "running",
            WorkoutState::Paused => "paused",
            WorkoutState::Completed => "completed",
            WorkoutState::Cancelled => "cancelled",
        }
    }
}

/// How a finished workout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    Completed,
    Cancelled,
}

/// Interval workout state machine.
///
/// Owns the active [`PhaseTimer`]; readers only ever get copies.
pub struct WorkoutEngine<H: WorkoutCues, C: Clock = SystemClock> {
    cues: H,
    clock: C,
    plan: Option<WorkoutPlan>,
    state: WorkoutState,
    phase: Phase,
    /// 1-based; meaningful during high/low phases.
    current_interval: u32,
    timer: Option<PhaseTimer>,
    /// Total remaining captured at pause or cancel.
    frozen_remaining_ms: u64,
    end_time_estimate: Option<DateTime<Utc>>,
    publish_interval_ms: u64,
    last_published_remaining_ms: u64,
}

impl<H: WorkoutCues> WorkoutEngine<H, SystemClock> {
    pub fn new(cues: H) -> Self {
        Self::with_clock(cues, SystemClock)
    }
}

impl<H: WorkoutCues, C: Clock> WorkoutEngine<H, C> {
    pub fn with_clock(cues: H, clock: C) -> Self {
        Self {
            cues,
            clock,
            plan: None,
            state: WorkoutState::Idle,
            phase: Phase::WarmUp,
            current_interval: 1,
            timer: None,
            frozen_remaining_ms: 0,
            end_time_estimate: None,
            publish_interval_ms: DEFAULT_PUBLISH_INTERVAL_MS,
            last_published_remaining_ms: 0,
        }
    }

    /// Minimum workout time between two progress-only live status updates.
    pub fn with_publish_interval(mut self, interval_ms: u64) -> Self {
        self.publish_interval_ms = interval_ms;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> WorkoutState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_interval(&self) -> u32 {
        self.current_interval
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    pub fn intervals(&self) -> u32 {
        self.plan.map(|p| p.intervals).unwrap_or(0)
    }

    pub fn is_paused(&self) -> bool {
        self.state == WorkoutState::Paused
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn terminal(&self) -> Option<Terminal> {
        match self.state {
            WorkoutState::Completed => Some(Terminal::Completed),
            WorkoutState::Cancelled => Some(Terminal::Cancelled),
            _ => None,
        }
    }

    pub fn cues(&self) -> &H {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut H {
        &mut self.cues
    }

    pub fn remaining_in_phase_ms(&self) -> u64 {
        self.timer.as_ref().map(PhaseTimer::remaining_ms).unwrap_or(0)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        match self.state {
            WorkoutState::Completed => 1.0,
            _ => self.timer.as_ref().map(PhaseTimer::progress).unwrap_or(0.0),
        }
    }

    /// Time left in the whole workout.
    ///
    /// Recomputed from the active timer and the plan on every call.
    pub fn total_time_remaining_ms(&self) -> u64 {
        match self.state {
            WorkoutState::Idle => self.plan.map(|p| p.total_ms()).unwrap_or(0),
            WorkoutState::Running | WorkoutState::Paused => self
                .remaining_in_phase_ms()
                .saturating_add(self.not_started_ms()),
            WorkoutState::Completed => 0,
            WorkoutState::Cancelled => self.frozen_remaining_ms,
        }
    }

    /// 0.0 ..= 1.0 across the whole workout. Exactly 1.0 once complete.
    pub fn progress(&self) -> f64 {
        match self.state {
            WorkoutState::Idle => 0.0,
            WorkoutState::Completed => 1.0,
            _ => {
                let total = self.plan.map(|p| p.total_ms()).unwrap_or(0);
                if total == 0 {
                    return 0.0;
                }
                let elapsed = total.saturating_sub(self.total_time_remaining_ms());
                (elapsed as f64 / total as f64).clamp(0.0, 1.0)
            }
        }
    }

    /// Current record for the live display.
    pub fn status(&self) -> LiveStatus {
        let is_paused = self.state == WorkoutState::Paused;
        LiveStatus {
            end_time_estimate: match self.state {
                WorkoutState::Running | WorkoutState::Completed => self.end_time_estimate,
                _ => None,
            },
            progress: self.progress(),
            is_complete: self.state == WorkoutState::Completed,
            is_paused,
            is_cancelled: self.state == WorkoutState::Cancelled,
            frozen_remaining_ms: if is_paused { self.frozen_remaining_ms } else { 0 },
            stale_at: None,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            interval: self.current_interval,
            intervals: self.intervals(),
            remaining_in_phase_ms: self.remaining_in_phase_ms(),
            total_remaining_ms: self.total_time_remaining_ms(),
            progress: self.progress(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the plan for the next `start()`.
    pub fn configure(&mut self, plan: WorkoutPlan) -> Result<(), WorkoutError> {
        if self.state.is_active() {
            return Err(WorkoutError::AlreadyRunning);
        }
        plan.validate()?;
        self.plan = Some(plan);
        Ok(())
    }

    pub fn start_with(&mut self, plan: WorkoutPlan) -> Result<Event, WorkoutError> {
        self.configure(plan)?;
        self.start()
    }

    /// Begin the configured workout. Allowed again after a terminal state.
    pub fn start(&mut self) -> Result<Event, WorkoutError> {
        if self.state.is_active() {
            return Err(WorkoutError::AlreadyRunning);
        }
        let plan = self.plan.ok_or(WorkoutError::InvalidTransition {
            command: "start",
            state: "unconfigured",
        })?;

        let (phase, duration_ms) = if plan.has_warm_up() {
            (Phase::WarmUp, plan.warm_up_ms)
        } else {
            (Phase::HighIntensity, plan.high_intensity_ms)
        };
        self.timer = Some(PhaseTimer::start(duration_ms)?);
        self.phase = phase;
        self.current_interval = 1;
        self.frozen_remaining_ms = 0;
        self.state = WorkoutState::Running;

        let now = self.clock.now();
        let total_ms = plan.total_ms();
        let end_time_estimate = offset(now, total_ms);
        self.end_time_estimate = Some(end_time_estimate);

        debug!(?phase, intervals = plan.intervals, total_ms, "workout started");
        self.play_phase_cues(phase);
        self.publish_transition();

        Ok(Event::WorkoutStarted {
            phase,
            intervals: plan.intervals,
            total_ms,
            end_time_estimate,
            at: now,
        })
    }

    /// Advance the active phase by `delta_ms`.
    ///
    /// Returns an event when a phase ends. At most one phase ends per tick;
    /// time beyond the end of a phase is dropped.
    pub fn tick(&mut self, delta_ms: u64) -> Result<Option<Event>, WorkoutError> {
        match self.state {
            WorkoutState::Running => {}
            WorkoutState::Paused => return Ok(None),
            other => {
                return Err(WorkoutError::InvalidTransition {
                    command: "tick",
                    state: other.as_str(),
                })
            }
        }
        let (Some(plan), Some(timer)) = (self.plan, self.timer.as_mut()) else {
            return Err(WorkoutError::InvalidTransition {
                command: "tick",
                state: "unconfigured",
            });
        };

        if !timer.tick(delta_ms) {
            self.publish_progress();
            return Ok(None);
        }
        self.advance(plan).map(Some)
    }

    /// Freeze the countdown. No-op if already paused.
    pub fn pause(&mut self) -> Result<Option<Event>, WorkoutError> {
        match self.state {
            WorkoutState::Running => {}
            WorkoutState::Paused => return Ok(None),
            other => {
                return Err(WorkoutError::InvalidTransition {
                    command: "pause",
                    state: other.as_str(),
                })
            }
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.pause();
        }
        self.state = WorkoutState::Paused;
        self.frozen_remaining_ms = self.total_time_remaining_ms();
        self.end_time_estimate = None;

        debug!(remaining_ms = self.frozen_remaining_ms, "workout paused");
        self.publish_transition();

        Ok(Some(Event::WorkoutPaused {
            phase: self.phase,
            remaining_in_phase_ms: self.remaining_in_phase_ms(),
            total_remaining_ms: self.frozen_remaining_ms,
            at: self.clock.now(),
        }))
    }

    /// Continue after `pause()`. The end-time estimate is recomputed from
    /// now, since the previous one went stale while paused.
    pub fn resume(&mut self) -> Result<Event, WorkoutError> {
        if self.state != WorkoutState::Paused {
            return Err(WorkoutError::InvalidTransition {
                command: "resume",
                state: self.state.as_str(),
            });
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.resume();
        }
        self.state = WorkoutState::Running;
        self.frozen_remaining_ms = 0;

        let now = self.clock.now();
        let end_time_estimate = offset(now, self.total_time_remaining_ms());
        self.end_time_estimate = Some(end_time_estimate);

        debug!(%end_time_estimate, "workout resumed");
        self.publish_transition();

        Ok(Event::WorkoutResumed {
            phase: self.phase,
            remaining_in_phase_ms: self.remaining_in_phase_ms(),
            end_time_estimate,
            at: now,
        })
    }

    /// End the workout early. Safe in any state; only an active workout
    /// produces an event.
    pub fn cancel(&mut self) -> Option<Event> {
        if !self.state.is_active() {
            return None;
        }
        let total_remaining_ms = self.total_time_remaining_ms();
        let progress = self.progress();

        self.timer = None;
        self.frozen_remaining_ms = total_remaining_ms;
        self.end_time_estimate = None;
        self.state = WorkoutState::Cancelled;

        debug!(total_remaining_ms, "workout cancelled");
        self.publish_transition();

        Some(Event::WorkoutCancelled {
            phase: self.phase,
            interval: self.current_interval,
            total_remaining_ms,
            progress,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Full duration of every phase that hasn't started yet.
    fn not_started_ms(&self) -> u64 {
        let Some(plan) = self.plan else {
            return 0;
        };
        let later_cycles = u64::from(plan.intervals.saturating_sub(self.current_interval));
        let later_ms = plan.interval_ms().saturating_mul(later_cycles);
        match self.phase {
            Phase::WarmUp => plan.intervals_total_ms(),
            Phase::HighIntensity => plan.low_intensity_ms.saturating_add(later_ms),
            Phase::LowIntensity => later_ms,
            Phase::Complete => 0,
        }
    }

    fn advance(&mut self, plan: WorkoutPlan) -> Result<Event, WorkoutError> {
        let next = match self.phase {
            Phase::WarmUp => Phase::HighIntensity,
            Phase::HighIntensity => Phase::LowIntensity,
            Phase::LowIntensity if self.current_interval < plan.intervals => {
                self.current_interval += 1;
                Phase::HighIntensity
            }
            Phase::LowIntensity | Phase::Complete => Phase::Complete,
        };
        if next == Phase::Complete {
            return Ok(self.complete(plan));
        }

        let duration_ms = match next {
            Phase::HighIntensity => plan.high_intensity_ms,
            _ => plan.low_intensity_ms,
        };
        match self.timer.as_mut() {
            Some(timer) => timer.restart(duration_ms)?,
            None => self.timer = Some(PhaseTimer::start(duration_ms)?),
        }
        self.phase = next;

        debug!(phase = ?next, interval = self.current_interval, "phase started");
        self.play_phase_cues(next);
        self.publish_transition();

        Ok(Event::PhaseStarted {
            phase: next,
            interval: self.current_interval,
            duration_ms,
            total_remaining_ms: self.total_time_remaining_ms(),
            at: self.clock.now(),
        })
    }

    fn complete(&mut self, plan: WorkoutPlan) -> Event {
        self.phase = Phase::Complete;
        self.state = WorkoutState::Completed;
        self.timer = None;
        self.frozen_remaining_ms = 0;

        debug!(intervals = plan.intervals, "workout completed");
        self.play_phase_cues(Phase::Complete);
        self.publish_transition();

        Event::WorkoutCompleted {
            intervals: plan.intervals,
            total_ms: plan.total_ms(),
            at: self.clock.now(),
        }
    }

    fn play_phase_cues(&mut self, phase: Phase) {
        let (tone, haptic) = match phase {
            Phase::WarmUp => (Tone::Ding, Haptic::WarmUp),
            Phase::HighIntensity => (Tone::Start, Haptic::HighIntensity),
            Phase::LowIntensity => (Tone::Gong, Haptic::LowIntensity),
            Phase::Complete => (Tone::Complete, Haptic::Completion),
        };
        self.cues.play_tone(tone);
        self.cues.play_haptic(haptic);
    }

    fn publish_transition(&mut self) {
        self.last_published_remaining_ms = self.total_time_remaining_ms();
        let status = self.status();
        self.publish(&status);
    }

    /// Progress-only update, throttled to one per publish interval of
    /// workout time.
    fn publish_progress(&mut self) {
        let remaining = self.total_time_remaining_ms();
        if self.last_published_remaining_ms.saturating_sub(remaining) < self.publish_interval_ms {
            return;
        }
        self.last_published_remaining_ms = remaining;
        let status = self.status().stale_from(self.clock.now());
        self.publish(&status);
    }

    fn publish(&mut self, status: &LiveStatus) {
        if let Err(e) = self.cues.publish_status(status) {
            warn!(error = %e, "live status update failed; continuing without it");
        }
    }
}

/// `now + ms`, saturating at the latest representable instant.
fn offset(now: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
