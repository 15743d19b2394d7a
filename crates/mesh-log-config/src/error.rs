//! Error types for the logging configuration

use crate::config::LogLevel;
use thiserror::Error;

/// Errors raised while loading or applying a logging configuration
#[derive(Error, Debug)]
pub enum LogConfigError {
    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown log level: {0}")]
    UnknownLevel(u8),

    #[error("Unknown log output: {0}")]
    UnknownOutput(u8),

    /// Initial level set higher than the configured ceiling
    #[error("Initial log level {initial:?} exceeds ceiling {ceiling:?}")]
    InitialAboveCeiling { initial: LogLevel, ceiling: LogLevel },

    /// Runtime level change without dynamic levels enabled
    #[error("Dynamic log level is disabled")]
    DynamicLevelDisabled,

    /// Runtime level change above the configured ceiling
    #[error("Requested log level {requested:?} exceeds ceiling {ceiling:?}")]
    AboveCeiling {
        requested: LogLevel,
        ceiling: LogLevel,
    },
}
