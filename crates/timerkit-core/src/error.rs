//! Core error types for timerkit-core.
//!
//! Engines only report configuration validation and edit-while-running.
//! Every other out-of-phase call is a no-op that returns `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timerkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Engine-level rejections
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stored collection errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the timer engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A duration or count is outside its allowed range.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Configuration edits are only accepted while the engine is idle.
    #[error("Configuration is not editable while {phase}")]
    NotEditable { phase: String },
}

impl EngineError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_editable(phase: impl std::fmt::Display) -> Self {
        EngineError::NotEditable {
            phase: phase.to_string(),
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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
}

/// Errors raised by the named-configuration store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No entry with this id under the storage key
    #[error("No entry '{id}' under '{key}'")]
    NotFound { key: String, id: String },

    /// Stored value could not be decoded
    #[error("Stored value under '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
