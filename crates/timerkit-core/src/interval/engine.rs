//! Interval (tabata) timer engine.
//!
//! A tick-driven state machine. It owns no clock: the host calls `tick()` once
//! per elapsed second and stops calling it while paused.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Prepare -> Work -> (Rest -> Work)* -> Done
//!           \________\________\-> Paused -> (back to the same phase)
//! ```
//!
//! A phase shows its zero second for a full tick; the switch happens on the
//! tick after that (..., 2, 1, 0, switch).
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = IntervalTimerEngine::new(TimerConfig::default());
//! engine.start()?;
//! // Once per second:
//! if let Some(outcome) = engine.tick() { /* render, play outcome.cue */ }
//! ```

use serde::{Deserialize, Serialize};

use super::config::{ConfigField, TimerConfig};
use crate::error::EngineError;
use crate::events::Event;
use crate::signal::{countdown_cue, Cue, Signaled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Prepare,
    Work,
    Rest,
    Paused,
    Done,
}

impl Phase {
    /// Phases in which time progresses.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Prepare | Phase::Work | Phase::Rest)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Prepare => "prepare",
            Phase::Work => "work",
            Phase::Rest => "rest",
            Phase::Paused => "paused",
            Phase::Done => "done",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

/// What a single `tick()` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub round: u32,
    pub transition: Option<PhaseChange>,
    pub round_changed: bool,
    pub cue: Option<Cue>,
    pub completed: bool,
}

impl TickOutcome {
    /// Notifications for this tick, in emission order.
    pub fn events(&self) -> Vec<Event> {
        let mut events = vec![Event::IntervalTick {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            round: self.round,
        }];
        if let Some(change) = self.transition {
            events.push(Event::PhaseChanged {
                from: change.from,
                to: change.to,
                round: self.round,
                remaining_seconds: self.remaining_seconds,
            });
        }
        if self.completed {
            events.push(Event::IntervalCompleted { rounds: self.round });
        }
        events
    }
}

impl Signaled for TickOutcome {
    fn cue(&self) -> Option<Cue> {
        self.cue
    }

    fn completed(&self) -> bool {
        self.completed
    }
}

/// Prepare / work / rest round cycling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTimerEngine {
    config: TimerConfig,
    phase: Phase,
    /// Only set while `phase == Paused`.
    #[serde(default)]
    phase_before_pause: Option<Phase>,
    remaining_seconds: u32,
    current_round: u32,
}

impl IntervalTimerEngine {
    /// Create an idle engine. The config is validated on `start()`.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            phase_before_pause: None,
            remaining_seconds: 0,
            current_round: 1,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_before_pause(&self) -> Option<Phase> {
        self.phase_before_pause
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn rounds(&self) -> u32 {
        self.config.rounds
    }

    /// Current config, for the host to persist.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_editable(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Cue for the value currently shown, while time is progressing.
    ///
    /// Ticks carry their own cue; hosts ask this after `start()` so a short
    /// prepare phase still counts down from its first second.
    pub fn current_cue(&self) -> Option<Cue> {
        if self.phase.is_active() {
            countdown_cue(self.remaining_seconds)
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::IntervalSnapshot {
            phase: self.phase,
            phase_before_pause: self.phase_before_pause,
            remaining_seconds: self.remaining_seconds,
            round: self.current_round,
            rounds: self.config.rounds,
            config: self.config,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run from `Idle` or `Done`. Ignored in any other phase.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the stored config has no work time or no rounds.
    pub fn start(&mut self) -> Result<Option<Event>, EngineError> {
        if !matches!(self.phase, Phase::Idle | Phase::Done) {
            return Ok(None);
        }
        self.config.validate()?;
        self.phase = Phase::Prepare;
        self.phase_before_pause = None;
        self.remaining_seconds = self.config.prepare_seconds;
        self.current_round = 1;
        tracing::debug!(rounds = self.config.rounds, "interval run started");
        Ok(Some(Event::IntervalStarted {
            prepare_seconds: self.config.prepare_seconds,
            rounds: self.config.rounds,
        }))
    }

    /// Replace the config and start in one step.
    ///
    /// Outside `Idle`/`Done` this is a no-op and the config is left untouched.
    pub fn start_with(&mut self, config: TimerConfig) -> Result<Option<Event>, EngineError> {
        if !matches!(self.phase, Phase::Idle | Phase::Done) {
            return Ok(None);
        }
        config.validate()?;
        self.config = config;
        self.start()
    }

    /// Advance one second. `None` when no time is progressing.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.phase.is_active() {
            return None;
        }

        let round_before = self.current_round;
        let (cue, transition) = match self.remaining_seconds.checked_sub(1) {
            Some(next) => {
                self.remaining_seconds = next;
                (countdown_cue(next), None)
            }
            None => {
                let from = self.phase;
                let to = self.advance_phase();
                tracing::debug!(%from, %to, round = self.current_round, "phase changed");
                let cue = if to.is_active() { countdown_cue(self.remaining_seconds) } else { None };
                (cue, Some(PhaseChange { from, to }))
            }
        };

        let completed = self.phase == Phase::Done;
        if completed {
            tracing::info!(rounds = self.config.rounds, "interval run completed");
        }

        Some(TickOutcome {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            round: self.current_round,
            transition,
            round_changed: self.current_round != round_before,
            cue,
            completed,
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.phase.is_active() {
            return None;
        }
        let phase = self.phase;
        self.phase_before_pause = Some(phase);
        self.phase = Phase::Paused;
        Some(Event::IntervalPaused {
            phase,
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.phase != Phase::Paused {
            return None;
        }
        let restored = self.phase_before_pause.take()?;
        self.phase = restored;
        Some(Event::IntervalResumed {
            phase: restored,
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Back to `Idle` from any phase.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Idle;
        self.phase_before_pause = None;
        self.remaining_seconds = self.config.prepare_seconds;
        self.current_round = 1;
        Some(Event::IntervalReset {
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Replace the config, discarding any run in progress.
    pub fn load_config(&mut self, config: TimerConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Change one setting while idle.
    ///
    /// # Errors
    /// `NotEditable` outside `Idle` (nothing changes), `InvalidConfig` when the
    /// new value would leave no work time or no rounds.
    pub fn edit_config(&mut self, field: ConfigField, value: u32) -> Result<(), EngineError> {
        if !self.is_editable() {
            return Err(EngineError::not_editable(self.phase));
        }
        let mut candidate = self.config;
        field.apply(&mut candidate, value);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    /// Step the round count by `delta`, flooring at one instead of rejecting.
    pub fn adjust_rounds(&mut self, delta: i32) -> Result<u32, EngineError> {
        if !self.is_editable() {
            return Err(EngineError::not_editable(self.phase));
        }
        let next = (i64::from(self.config.rounds) + i64::from(delta)).clamp(1, i64::from(u32::MAX));
        self.config.rounds = next as u32;
        Ok(self.config.rounds)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_phase(&mut self) -> Phase {
        let next = match self.phase {
            Phase::Prepare => {
                self.remaining_seconds = self.config.work_seconds;
                Phase::Work
            }
            Phase::Work if self.current_round < self.config.rounds => {
                self.remaining_seconds = self.config.rest_seconds;
                Phase::Rest
            }
            Phase::Work => {
                self.remaining_seconds = 0;
                Phase::Done
            }
            Phase::Rest => {
                self.current_round += 1;
                self.remaining_seconds = self.config.work_seconds;
                Phase::Work
            }
            other => other,
        };
        self.phase = next;
        next
    }
}
