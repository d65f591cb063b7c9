mod engine;
mod recipe;

pub use engine::{StepSequenceEngine, StepStatus, StepTickOutcome};
pub use recipe::{Recipe, TimerStep};
