//! Logging configuration for the mesh stack
//!
//! A typed, validated rendition of the stack's logging options (output sink,
//! severity ceiling, per-region toggles, line decoration) plus a logger that
//! applies them before handing lines to `tracing`.

pub mod config;
pub mod error;
pub mod level;
pub mod logger;

pub use config::{LogConfig, LogLevel, LogOutput, LogRegion, RegionToggles};
pub use error::LogConfigError;
pub use level::LogLevelControl;
pub use logger::MeshLogger;
