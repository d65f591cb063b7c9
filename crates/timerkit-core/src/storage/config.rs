//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Defaults for newly created tabata workouts and cooking recipes
//! - Stopwatch tick quantum
//! - Sound and vibration cues
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::interval::{TimerConfig, Workout};
use crate::steps::{Recipe, TimerStep};

/// Defaults for new tabata workouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabataDefaults {
    #[serde(default = "default_workout_name")]
    pub name: String,
    #[serde(default = "default_prepare")]
    pub prepare: u32,
    #[serde(default = "default_work")]
    pub work: u32,
    #[serde(default = "default_rest")]
    pub rest: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// Defaults for new cooking recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingDefaults {
    #[serde(default = "default_recipe_name")]
    pub name: String,
    #[serde(default = "default_step_duration")]
    pub step_duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchConfig {
    /// Wall-clock milliseconds between stopwatch ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsConfig {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub haptic: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tabata: TabataDefaults,
    #[serde(default)]
    pub cooking: CookingDefaults,
    #[serde(default)]
    pub stopwatch: StopwatchConfig,
    #[serde(default)]
    pub signals: SignalsConfig,
}

// Default functions
fn default_workout_name() -> String {
    "New workout".into()
}
fn default_prepare() -> u32 {
    10
}
fn default_work() -> u32 {
    20
}
fn default_rest() -> u32 {
    10
}
fn default_rounds() -> u32 {
    8
}
fn default_recipe_name() -> String {
    "New recipe".into()
}
fn default_step_duration() -> u32 {
    60
}
fn default_tick_ms() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for TabataDefaults {
    fn default() -> Self {
        Self {
            name: default_workout_name(),
            prepare: default_prepare(),
            work: default_work(),
            rest: default_rest(),
            rounds: default_rounds(),
        }
    }
}

impl Default for CookingDefaults {
    fn default() -> Self {
        Self {
            name: default_recipe_name(),
            step_duration: default_step_duration(),
        }
    }
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            sound: true,
            haptic: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing the default file if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse as
    /// the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Reject values that would produce an unusable workout, step or clock.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("tabata.work", u64::from(self.tabata.work)),
            ("tabata.rounds", u64::from(self.tabata.rounds)),
            ("cooking.step_duration", u64::from(self.cooking.step_duration)),
            ("stopwatch.tick_ms", self.stopwatch.tick_ms),
        ];
        match checks.iter().find(|(_, value)| *value < 1) {
            Some((key, _)) => Err(ConfigError::InvalidValue {
                key: (*key).to_string(),
                message: "must be at least 1".into(),
            }),
            None => Ok(()),
        }
    }

    /// Timer settings for a new workout.
    pub fn default_timer(&self) -> TimerConfig {
        TimerConfig::new(
            self.tabata.prepare,
            self.tabata.work,
            self.tabata.rest,
            self.tabata.rounds,
        )
    }

    pub fn new_workout(&self, name: Option<String>) -> Workout {
        Workout::new(name.unwrap_or_else(|| self.tabata.name.clone()), self.default_timer())
    }

    /// A new recipe with a single default step.
    pub fn new_recipe(&self, name: Option<String>) -> Recipe {
        let mut recipe = Recipe::new(name.unwrap_or_else(|| self.cooking.name.clone()));
        let id = recipe.next_step_id();
        recipe.steps.push(TimerStep {
            id,
            label: "Step 1".into(),
            // A hand-edited file may still hold 0.
            duration_seconds: self.cooking.step_duration.max(1),
        });
        recipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tabata.rounds, 8);
        assert_eq!(parsed.stopwatch.tick_ms, 10);
        assert!(parsed.signals.sound);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[tabata]\nwork = 45\n").unwrap();
        assert_eq!(parsed.tabata.work, 45);
        assert_eq!(parsed.tabata.prepare, 10);
        assert_eq!(parsed.cooking.step_duration, 60);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("signals.sound").as_deref(), Some("true"));
        assert_eq!(cfg.get("tabata.work").as_deref(), Some("20"));
        assert_eq!(cfg.get("cooking.name").as_deref(), Some("New recipe"));
        assert!(cfg.get("tabata.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("signals.haptic", "false").unwrap();
        cfg.set("tabata.rounds", "12").unwrap();
        cfg.set("tabata.name", "Morning").unwrap();
        assert!(!cfg.signals.haptic);
        assert_eq!(cfg.tabata.rounds, 12);
        assert_eq!(cfg.tabata.name, "Morning");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("tabata.nonexistent", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("signals.sound", "loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("tabata.work", "-3").is_err());
        assert_eq!(cfg.tabata.work, 20);
    }

    #[test]
    fn set_rejects_zero_durations() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("cooking.step_duration", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.cooking.step_duration, 60);
        assert!(cfg.set("tabata.work", "0").is_err());
        assert!(cfg.set("tabata.rounds", "0").is_err());
        assert!(cfg.set("tabata.rest", "0").is_ok());
    }

    #[test]
    fn new_recipe_never_has_zero_second_step() {
        let parsed: Config = toml::from_str("[cooking]\nstep_duration = 0\n").unwrap();
        assert!(parsed.validate().is_err());
        let recipe = parsed.new_recipe(None);
        assert_eq!(recipe.steps[0].duration_seconds, 1);
    }

    #[test]
    fn load_from_writes_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.tabata.work, 20);
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("cooking.step_duration", "90").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().cooking.step_duration, 90);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tabata = 3").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn new_entries_use_defaults() {
        let cfg = Config::default();
        let workout = cfg.new_workout(None);
        assert_eq!(workout.name, "New workout");
        assert_eq!(workout.timer, TimerConfig::new(10, 20, 10, 8));

        let recipe = cfg.new_recipe(Some("Stew".into()));
        assert_eq!(recipe.name, "Stew");
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.steps[0].duration_seconds, 60);
    }
}
