//! # TimerKit Core Library
//!
//! Host-agnostic timer engines for the TimerKit timer utility: a tabata-style
//! interval timer, a cooking step sequence and a stopwatch. A host (the
//! `timerkit` CLI, or any UI shell) owns the clock and calls `tick()`; the
//! engines only move between states and report what changed.
//!
//! ## Architecture
//!
//! - **Engines**: synchronous state machines with no clock, threads or I/O
//! - **Signals**: cue points (beep, vibration, completion) a host can play
//! - **Storage**: SQLite key/value lists of named workouts and recipes, and a
//!   TOML configuration file
//!
//! ## Key Components
//!
//! - [`IntervalTimerEngine`]: prepare / work / rest rounds
//! - [`StepSequenceEngine`]: recipe steps with manual advance
//! - [`StopwatchEngine`]: elapsed hundredths with laps
//! - [`Collection`]: persisted lists of [`Workout`]s and [`Recipe`]s

pub mod error;
pub mod events;
pub mod format;
pub mod interval;
pub mod signal;
pub mod steps;
pub mod stopwatch;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, EngineError, StorageError};
pub use events::Event;
pub use format::{format_clock, format_hundredths};
pub use interval::{ConfigField, IntervalTimerEngine, Phase, PhaseChange, TickOutcome, TimerConfig, Workout};
pub use signal::{dispatch, Cue, SignalSink, Signaled};
pub use steps::{Recipe, StepSequenceEngine, StepStatus, StepTickOutcome, TimerStep};
pub use stopwatch::{Lap, StopwatchEngine, StopwatchState};
pub use storage::{Collection, Config, Database, Named};
