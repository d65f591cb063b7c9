use serde::{Deserialize, Serialize};

use crate::interval::{Phase, TimerConfig};
use crate::steps::StepStatus;

/// Every state change an engine makes produces an Event.
/// Hosts render them, print them, or ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // ── Interval ─────────────────────────────────────────────────────
    IntervalStarted {
        prepare_seconds: u32,
        rounds: u32,
    },
    /// Fires for every effective tick, after any transition resolved.
    IntervalTick {
        phase: Phase,
        remaining_seconds: u32,
        round: u32,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        round: u32,
        remaining_seconds: u32,
    },
    IntervalPaused {
        phase: Phase,
        remaining_seconds: u32,
    },
    IntervalResumed {
        phase: Phase,
        remaining_seconds: u32,
    },
    IntervalReset {
        remaining_seconds: u32,
    },
    /// Fires once, on entering Done.
    IntervalCompleted {
        rounds: u32,
    },
    IntervalSnapshot {
        phase: Phase,
        phase_before_pause: Option<Phase>,
        remaining_seconds: u32,
        round: u32,
        rounds: u32,
        config: TimerConfig,
    },

    // ── Cooking steps ────────────────────────────────────────────────
    StepStarted {
        step_index: usize,
        label: String,
        duration_seconds: u32,
    },
    StepTick {
        step_index: usize,
        remaining_seconds: u32,
    },
    StepCompleted {
        step_index: usize,
        label: String,
    },
    RecipeCompleted {
        steps: usize,
    },
    StepsPaused {
        step_index: usize,
        remaining_seconds: u32,
    },
    StepsResumed {
        step_index: usize,
        remaining_seconds: u32,
    },
    StepsReset,
    StepSnapshot {
        status: StepStatus,
        step_index: usize,
        step_count: usize,
        step_label: String,
        remaining_seconds: u32,
    },

    // ── Stopwatch ────────────────────────────────────────────────────
    StopwatchStarted {
        elapsed_hundredths: u64,
    },
    StopwatchStopped {
        elapsed_hundredths: u64,
    },
    LapRecorded {
        number: usize,
        elapsed_hundredths: u64,
    },
    StopwatchReset,
}
