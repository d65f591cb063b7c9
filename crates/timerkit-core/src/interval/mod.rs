mod config;
mod engine;

pub use config::{ConfigField, TimerConfig, Workout};
pub use engine::{IntervalTimerEngine, Phase, PhaseChange, TickOutcome};
