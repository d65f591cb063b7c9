//! Cooking step-sequence engine.
//!
//! Counts down one recipe step at a time. Unlike the interval engine it does
//! not move on by itself: when a step runs out the engine waits in
//! `StepComplete` until the host calls `advance()`. The last step finishing
//! goes straight to `AllComplete`.

use serde::{Deserialize, Serialize};

use super::recipe::{Recipe, TimerStep};
use crate::error::EngineError;
use crate::events::Event;
use crate::signal::{Cue, Signaled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Idle,
    Running,
    Paused,
    StepComplete,
    AllComplete,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Idle => "idle",
            StepStatus::Running => "running",
            StepStatus::Paused => "paused",
            StepStatus::StepComplete => "step complete",
            StepStatus::AllComplete => "all complete",
        };
        f.write_str(s)
    }
}

/// What a single `tick()` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTickOutcome {
    pub status: StepStatus,
    pub step_index: usize,
    pub remaining_seconds: u32,
    pub step_completed: bool,
    pub all_completed: bool,
}

impl StepTickOutcome {
    pub fn events(&self, recipe: &Recipe) -> Vec<Event> {
        let mut events = vec![Event::StepTick {
            step_index: self.step_index,
            remaining_seconds: self.remaining_seconds,
        }];
        if self.step_completed {
            events.push(Event::StepCompleted {
                step_index: self.step_index,
                label: recipe
                    .steps
                    .get(self.step_index)
                    .map(|s| s.label.clone())
                    .unwrap_or_default(),
            });
        }
        if self.all_completed {
            events.push(Event::RecipeCompleted {
                steps: recipe.steps.len(),
            });
        }
        events
    }
}

impl Signaled for StepTickOutcome {
    fn cue(&self) -> Option<Cue> {
        self.step_completed.then_some(Cue::All)
    }

    fn completed(&self) -> bool {
        self.all_completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSequenceEngine {
    recipe: Recipe,
    status: StepStatus,
    cursor: usize,
    remaining_seconds: u32,
}

impl StepSequenceEngine {
    pub fn new(recipe: Recipe) -> Self {
        let remaining_seconds = first_duration(&recipe);
        Self {
            recipe,
            status: StepStatus::Idle,
            cursor: 0,
            remaining_seconds,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.recipe.steps.len()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_step(&self) -> Option<&TimerStep> {
        self.recipe.steps.get(self.cursor)
    }

    /// Current recipe, for the host to persist.
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn is_editable(&self) -> bool {
        self.status == StepStatus::Idle
    }

    pub fn snapshot(&self) -> Event {
        Event::StepSnapshot {
            status: self.status,
            step_index: self.cursor,
            step_count: self.step_count(),
            step_label: self.current_step().map(|s| s.label.clone()).unwrap_or_default(),
            remaining_seconds: self.remaining_seconds,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the first step. Ignored unless idle.
    ///
    /// # Errors
    /// `InvalidConfig` when the recipe has no steps.
    pub fn start(&mut self) -> Result<Option<Event>, EngineError> {
        if self.status != StepStatus::Idle {
            return Ok(None);
        }
        let first = self
            .recipe
            .steps
            .first()
            .ok_or_else(|| EngineError::invalid("steps", "recipe has no steps"))?;
        let event = Event::StepStarted {
            step_index: 0,
            label: first.label.clone(),
            duration_seconds: first.duration_seconds,
        };
        self.cursor = 0;
        self.remaining_seconds = first.duration_seconds;
        self.status = StepStatus::Running;
        tracing::debug!(recipe = %self.recipe.name, "recipe started");
        Ok(Some(event))
    }

    pub fn tick(&mut self) -> Option<StepTickOutcome> {
        if self.status != StepStatus::Running {
            return None;
        }

        let mut step_completed = false;
        match self.remaining_seconds.checked_sub(1) {
            Some(next) => self.remaining_seconds = next,
            None => {
                step_completed = true;
                self.status = if self.cursor + 1 >= self.recipe.steps.len() {
                    tracing::info!(recipe = %self.recipe.name, "recipe completed");
                    StepStatus::AllComplete
                } else {
                    tracing::debug!(step = self.cursor, "step completed");
                    StepStatus::StepComplete
                };
            }
        }

        Some(StepTickOutcome {
            status: self.status,
            step_index: self.cursor,
            remaining_seconds: self.remaining_seconds,
            step_completed,
            all_completed: self.status == StepStatus::AllComplete,
        })
    }

    /// Move to the next step after one finished.
    pub fn advance(&mut self) -> Option<Event> {
        if self.status != StepStatus::StepComplete {
            return None;
        }
        let next = self.recipe.steps.get(self.cursor + 1)?;
        let event = Event::StepStarted {
            step_index: self.cursor + 1,
            label: next.label.clone(),
            duration_seconds: next.duration_seconds,
        };
        self.remaining_seconds = next.duration_seconds;
        self.cursor += 1;
        self.status = StepStatus::Running;
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.status != StepStatus::Running {
            return None;
        }
        self.status = StepStatus::Paused;
        Some(Event::StepsPaused {
            step_index: self.cursor,
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.status != StepStatus::Paused {
            return None;
        }
        self.status = StepStatus::Running;
        Some(Event::StepsResumed {
            step_index: self.cursor,
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.status = StepStatus::Idle;
        self.cursor = 0;
        self.remaining_seconds = first_duration(&self.recipe);
        Some(Event::StepsReset)
    }

    // ── Editing (idle only) ──────────────────────────────────────────

    /// Append a step and return its id.
    pub fn append_step(&mut self, label: impl Into<String>, duration_seconds: u32) -> Result<u64, EngineError> {
        self.ensure_editable()?;
        validate_duration(duration_seconds)?;
        let id = self.recipe.next_step_id();
        self.recipe.steps.push(TimerStep {
            id,
            label: label.into(),
            duration_seconds,
        });
        self.remaining_seconds = first_duration(&self.recipe);
        Ok(id)
    }

    pub fn update_step(&mut self, id: u64, label: Option<String>, duration_seconds: Option<u32>) -> Result<(), EngineError> {
        self.ensure_editable()?;
        if let Some(d) = duration_seconds {
            validate_duration(d)?;
        }
        let step = self
            .recipe
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| EngineError::invalid("step", format!("no step with id {id}")))?;
        if let Some(label) = label {
            step.label = label;
        }
        if let Some(d) = duration_seconds {
            step.duration_seconds = d;
        }
        self.remaining_seconds = first_duration(&self.recipe);
        Ok(())
    }

    pub fn remove_step(&mut self, id: u64) -> Result<TimerStep, EngineError> {
        self.ensure_editable()?;
        let pos = self
            .recipe
            .steps
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EngineError::invalid("step", format!("no step with id {id}")))?;
        let removed = self.recipe.steps.remove(pos);
        self.remaining_seconds = first_duration(&self.recipe);
        Ok(removed)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), EngineError> {
        self.ensure_editable()?;
        self.recipe.name = name.into();
        Ok(())
    }

    /// Notes are not part of the timing, so they can change at any time.
    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.recipe.memo = memo.into();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ensure_editable(&self) -> Result<(), EngineError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(EngineError::not_editable(self.status))
        }
    }
}

fn first_duration(recipe: &Recipe) -> u32 {
    recipe.steps.first().map(|s| s.duration_seconds).unwrap_or(0)
}

fn validate_duration(duration_seconds: u32) -> Result<(), EngineError> {
    if duration_seconds < 1 {
        return Err(EngineError::invalid("duration", "step duration must be at least 1 second"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(durations: &[u32]) -> Recipe {
        let mut recipe = Recipe::new("Test");
        for (i, d) in durations.iter().enumerate() {
            recipe.steps.push(TimerStep {
                id: i as u64 + 1,
                label: format!("Step {}", i + 1),
                duration_seconds: *d,
            });
        }
        recipe
    }

    fn run(engine: &mut StepSequenceEngine, n: u32) -> Vec<StepTickOutcome> {
        (0..n).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn idle_shows_first_duration() {
        let engine = StepSequenceEngine::new(recipe(&[300, 240, 60]));
        assert_eq!(engine.status(), StepStatus::Idle);
        assert_eq!(engine.remaining_seconds(), 300);
    }

    #[test]
    fn step_completes_and_waits_for_advance() {
        let mut engine = StepSequenceEngine::new(recipe(&[300, 240, 60]));
        engine.start().unwrap();

        let outcomes = run(&mut engine, 301);
        let last = outcomes.last().unwrap();
        assert!(last.step_completed);
        assert!(!last.all_completed);
        assert_eq!(last.cue(), Some(Cue::All));
        assert_eq!(engine.status(), StepStatus::StepComplete);
        assert_eq!(engine.cursor(), 0);

        // Further ticks do nothing until the host advances.
        assert!(engine.tick().is_none());
        assert_eq!(engine.cursor(), 0);

        engine.advance().unwrap();
        assert_eq!(engine.status(), StepStatus::Running);
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.remaining_seconds(), 240);
    }

    #[test]
    fn last_step_goes_straight_to_all_complete() {
        let mut engine = StepSequenceEngine::new(recipe(&[300, 240, 60]));
        engine.start().unwrap();
        run(&mut engine, 301);
        engine.advance();
        run(&mut engine, 241);
        engine.advance();
        let outcomes = run(&mut engine, 61);
        let last = outcomes.last().unwrap();
        assert!(last.all_completed);
        assert!(last.completed());
        assert_eq!(engine.status(), StepStatus::AllComplete);
        assert!(engine.advance().is_none());
    }

    #[test]
    fn start_requires_steps() {
        let mut engine = StepSequenceEngine::new(Recipe::new("Empty"));
        assert!(engine.start().is_err());
        assert_eq!(engine.status(), StepStatus::Idle);
    }

    #[test]
    fn pause_and_resume_keep_remaining() {
        let mut engine = StepSequenceEngine::new(recipe(&[10]));
        engine.start().unwrap();
        run(&mut engine, 4);
        engine.pause().unwrap();
        assert!(engine.tick().is_none());
        assert!(engine.pause().is_none());
        engine.resume().unwrap();
        assert_eq!(engine.remaining_seconds(), 6);
        assert_eq!(engine.status(), StepStatus::Running);
    }

    #[test]
    fn reset_from_step_complete() {
        let mut engine = StepSequenceEngine::new(recipe(&[1, 5]));
        engine.start().unwrap();
        run(&mut engine, 2);
        assert_eq!(engine.status(), StepStatus::StepComplete);
        engine.reset();
        assert_eq!(engine.status(), StepStatus::Idle);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.remaining_seconds(), 1);
    }

    #[test]
    fn steps_append_only_while_idle() {
        let mut engine = StepSequenceEngine::new(recipe(&[60]));
        let id = engine.append_step("Rest", 30).unwrap();
        assert_eq!(engine.step_count(), 2);
        assert!(engine.recipe().step(id).is_some());

        engine.start().unwrap();
        let err = engine.append_step("Late", 30).unwrap_err();
        assert!(matches!(err, EngineError::NotEditable { .. }));
        assert_eq!(engine.step_count(), 2);
    }

    #[test]
    fn editing_steps_refreshes_idle_display() {
        let mut engine = StepSequenceEngine::new(recipe(&[60, 90]));
        engine.update_step(1, Some("Sear".into()), Some(45)).unwrap();
        assert_eq!(engine.remaining_seconds(), 45);
        assert_eq!(engine.recipe().steps[0].label, "Sear");

        engine.remove_step(1).unwrap();
        assert_eq!(engine.remaining_seconds(), 90);
        assert!(engine.remove_step(1).is_err());
        assert!(engine.update_step(2, None, Some(0)).is_err());
    }

    #[test]
    fn tick_events_name_the_finished_step() {
        let mut engine = StepSequenceEngine::new(recipe(&[1]));
        engine.start().unwrap();
        let outcomes = run(&mut engine, 2);
        let events = outcomes[1].events(engine.recipe());
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[1], Event::StepCompleted { label, .. } if label == "Step 1"));
        assert!(matches!(events[2], Event::RecipeCompleted { steps: 1 }));
    }
}
