//! Error types
//!
//! Nothing in the engine is fatal. Bad input is rejected with an
//! `InputError` and the previous state is kept; configuration problems are
//! reported as `ConfigError` so the caller can fall back to defaults.

use std::fmt;

/// A command the engine refused without changing state
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// Angle or speed was NaN or infinite
    NonFinite { angle_degrees: f32, speed: f32 },
    /// Answer field left blank
    EmptyAnswer,
    /// Challenge needs two answers but only got one
    MissingSecondAnswer,
    /// Numeric challenge answer did not parse
    NotANumber(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NonFinite {
                angle_degrees,
                speed,
            } => write!(
                f,
                "launch parameters must be finite (angle {angle_degrees}, speed {speed})"
            ),
            InputError::EmptyAnswer => write!(f, "answer is empty"),
            InputError::MissingSecondAnswer => write!(f, "this challenge needs two answers"),
            InputError::NotANumber(s) => write!(f, "'{s}' is not a number"),
        }
    }
}

impl std::error::Error for InputError {}

/// Settings or level data could not be used
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Parsed fine but violates a physical constraint
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "read failed: {e}"),
            ConfigError::Json(e) => write!(f, "parse failed: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
