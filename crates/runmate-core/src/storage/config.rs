//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Workout durations (warm-up, high, low, interval count)
//! - Cue preferences (sound, haptics)
//! - Engine pacing (tick size, live status throttle, get-ready countdown)
//!
//! Configuration is stored at `~/.config/runmate/config.toml`. The workout
//! engine only reads it, once, when a run starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, WorkoutError};
use crate::live_status::DEFAULT_PUBLISH_INTERVAL_MS;
use crate::workout::{WorkoutPlan, DEFAULT_TICK_MS};

/// Durations for the next run, in whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_warm_up_secs")]
    pub warm_up_secs: u64,
    #[serde(default = "default_high_intensity_secs")]
    pub high_intensity_secs: u64,
    #[serde(default = "default_low_intensity_secs")]
    pub low_intensity_secs: u64,
    #[serde(default = "default_intervals")]
    pub intervals: u32,
}

/// Sound and vibration preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub haptics: bool,
}

/// Driver pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_publish_interval_ms")]
    pub publish_interval_ms: u64,
    /// "Get ready" countdown before the first phase. 0 disables it.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/runmate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

// Default functions
fn default_warm_up_secs() -> u64 {
    30
}
fn default_high_intensity_secs() -> u64 {
    100
}
fn default_low_intensity_secs() -> u64 {
    80
}
fn default_intervals() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}
fn default_publish_interval_ms() -> u64 {
    DEFAULT_PUBLISH_INTERVAL_MS
}
fn default_countdown_secs() -> u64 {
    3
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            warm_up_secs: default_warm_up_secs(),
            high_intensity_secs: default_high_intensity_secs(),
            low_intensity_secs: default_low_intensity_secs(),
            intervals: default_intervals(),
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            sound: true,
            haptics: true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            publish_interval_ms: default_publish_interval_ms(),
            countdown_secs: default_countdown_secs(),
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
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("expected true or false: {e}")))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|e| invalid(format!("expected a whole number: {e}")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) => return Err(invalid("not a leaf key".into())),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
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

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the value doesn't fit the existing type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The workout plan described by these settings, validated.
    pub fn plan(&self) -> Result<WorkoutPlan, WorkoutError> {
        let plan = WorkoutPlan::from_secs(
            self.workout.warm_up_secs,
            self.workout.high_intensity_secs,
            self.workout.low_intensity_secs,
            self.workout.intervals,
        );
        plan.validate()?;
        Ok(plan)
    }
}
