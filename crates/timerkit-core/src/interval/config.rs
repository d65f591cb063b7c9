use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Durations and round count for an interval run.
///
/// Durations are whole seconds. Serialized field names match the stored
/// workout shape (`prepare`, `work`, `rest`, `rounds`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(rename = "prepare")]
    pub prepare_seconds: u32,
    #[serde(rename = "work")]
    pub work_seconds: u32,
    #[serde(rename = "rest")]
    pub rest_seconds: u32,
    pub rounds: u32,
}

impl TimerConfig {
    pub fn new(prepare_seconds: u32, work_seconds: u32, rest_seconds: u32, rounds: u32) -> Self {
        Self {
            prepare_seconds,
            work_seconds,
            rest_seconds,
            rounds,
        }
    }

    /// Check `work_seconds >= 1` and `rounds >= 1`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.work_seconds < 1 {
            return Err(EngineError::invalid("work", "work duration must be at least 1 second"));
        }
        if self.rounds < 1 {
            return Err(EngineError::invalid("rounds", "round count must be at least 1"));
        }
        Ok(())
    }

    /// Number of ticks from `start()` until the run enters `Done`.
    ///
    /// Every phase shows its zero second for one tick before switching, hence
    /// the `+ 1` on each phase.
    pub fn total_ticks(&self) -> u64 {
        let rounds = u64::from(self.rounds);
        let prepare = u64::from(self.prepare_seconds) + 1;
        let work = rounds * (u64::from(self.work_seconds) + 1);
        let rest = rounds.saturating_sub(1) * (u64::from(self.rest_seconds) + 1);
        prepare + work + rest
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(10, 20, 10, 8)
    }
}

/// A single editable setting of a [`TimerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigField {
    Prepare,
    Work,
    Rest,
    Rounds,
}

impl ConfigField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::Prepare => "prepare",
            ConfigField::Work => "work",
            ConfigField::Rest => "rest",
            ConfigField::Rounds => "rounds",
        }
    }

    pub(crate) fn apply(&self, config: &mut TimerConfig, value: u32) {
        match self {
            ConfigField::Prepare => config.prepare_seconds = value,
            ConfigField::Work => config.work_seconds = value,
            ConfigField::Rest => config.rest_seconds = value,
            ConfigField::Rounds => config.rounds = value,
        }
    }
}

impl std::str::FromStr for ConfigField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prepare" => Ok(ConfigField::Prepare),
            "work" => Ok(ConfigField::Work),
            "rest" => Ok(ConfigField::Rest),
            "rounds" => Ok(ConfigField::Rounds),
            other => Err(EngineError::invalid(other, "expected prepare, work, rest or rounds")),
        }
    }
}

/// A named, persisted tabata routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub timer: TimerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workout {
    pub fn new(name: impl Into<String>, timer: TimerConfig) -> Self {
        Self {
            id: format!("workout_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            timer,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_work_and_rounds() {
        assert!(TimerConfig::new(0, 0, 0, 1).validate().is_err());
        assert!(TimerConfig::new(0, 1, 0, 0).validate().is_err());
        assert!(TimerConfig::new(0, 1, 0, 1).validate().is_ok());
    }

    #[test]
    fn total_ticks_matches_reference_example() {
        let cfg = TimerConfig::new(10, 20, 10, 2);
        assert_eq!(cfg.total_ticks(), 11 + 21 + 11 + 21);
    }

    #[test]
    fn workout_serializes_flat() {
        let w = Workout {
            id: "workout_1".into(),
            name: "Legs".into(),
            timer: TimerConfig::new(5, 30, 15, 4),
            updated_at: None,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["prepare"], 5);
        assert_eq!(json["work"], 30);
        assert_eq!(json["rest"], 15);
        assert_eq!(json["rounds"], 4);
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn workout_reads_stored_shape() {
        let json = r#"{"id":"workout_9","name":"Core","prepare":10,"work":20,"rest":10,"rounds":8}"#;
        let w: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(w.timer, TimerConfig::default());
        assert_eq!(w.name, "Core");
    }

    #[test]
    fn field_parses_case_insensitively() {
        assert_eq!("Work".parse::<ConfigField>().unwrap(), ConfigField::Work);
        assert!("pause".parse::<ConfigField>().is_err());
    }
}
