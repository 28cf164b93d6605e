//! Core error types for runepause-core.
//!
//! The scheduling core has very few failure modes. Bad definitions are
//! rejected when they are built, unknown catalog keys fail fast, and
//! settings I/O errors surface from the settings store. Nothing inside a
//! running countdown or stepper can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for runepause-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog lookup errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An operation was requested in a mode that does not accept it
    #[error("Cannot {action} while {mode}")]
    InvalidTransition { action: &'static str, mode: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not resolve the settings directory
    #[error("Cannot resolve settings directory: {0}")]
    NoDataDir(String),
}

/// Validation errors raised when building definitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// A timed segment with no duration
    #[error("{collection}[{index}] has a zero-second duration")]
    ZeroDuration { collection: String, index: usize },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Unknown catalog keys. These indicate a programming or configuration
/// mistake and are never silently replaced by a default.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown breathing pattern '{0}' (expected one of: 4-7-8, box)")]
    UnknownPattern(String),

    #[error("Unknown stretch routine '{0}' (expected one of: desk, full)")]
    UnknownRoutine(String),

    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
