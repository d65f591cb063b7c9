use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timed step of a recipe.
///
/// Stored as `{ "id", "stepName", "duration" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStep {
    pub id: u64,
    #[serde(rename = "stepName")]
    pub label: String,
    /// Duration in seconds.
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
}

/// A named, persisted cooking recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub memo: String,
    #[serde(rename = "timers", default)]
    pub steps: Vec<TimerStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: format!("recipe_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            memo: String::new(),
            steps: Vec::new(),
            updated_at: None,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.duration_seconds)).sum()
    }

    pub fn step(&self, id: u64) -> Option<&TimerStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Id for a new step: creation time in milliseconds, bumped past any
    /// existing id so two steps added in the same millisecond stay distinct.
    /// If the largest id is `u64::MAX`, the first unused id is taken instead.
    pub fn next_step_id(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let max = self.steps.iter().map(|s| s.id).max().unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => now.max(next),
            None => std::iter::once(now)
                .chain(1..)
                .find(|id| self.step(*id).is_none())
                .unwrap_or_default(),
        }
    }
}
