//! Core error types for runmate-core.
//!
//! Workout commands report failures through [`WorkoutError`]; settings
//! loading and saving go through [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the phase timer and the workout state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkoutError {
    /// A phase duration or interval count that cannot be run. `value` is in
    /// milliseconds for durations and a plain count for `intervals`.
    #[error("Invalid duration for '{field}': {value} (must be greater than zero)")]
    InvalidDuration { field: &'static str, value: u64 },

    /// `start` or `configure` while a workout is running or paused.
    #[error("A workout is already running; cancel it first")]
    AlreadyRunning,

    /// A command that makes no sense in the current state.
    #[error("Cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: &'static str,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a live status publisher.
///
/// The engine logs these and carries on; they never abort a workout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Live status update rejected: {0}")]
pub struct PublishError(pub String);
