//! Runtime log level control

use crate::config::{LogConfig, LogLevel};
use crate::error::LogConfigError;
use std::sync::atomic::{AtomicU8, Ordering};

/// Current log level, adjustable at runtime only below the ceiling
#[derive(Debug)]
pub struct LogLevelControl {
    ceiling: LogLevel,
    dynamic: bool,
    current: AtomicU8,
}

impl LogLevelControl {
    #[must_use]
    pub fn new(config: &LogConfig) -> Self {
        Self {
            ceiling: config.level,
            dynamic: config.dynamic_level,
            current: AtomicU8::new(config.initial_level() as u8),
        }
    }

    #[must_use]
    pub fn ceiling(&self) -> LogLevel {
        self.ceiling
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        // Only valid levels are ever stored
        LogLevel::try_from(self.current.load(Ordering::Relaxed)).unwrap_or(self.ceiling)
    }

    /// Change the level; requires dynamic levels and never exceeds the ceiling
    #[allow(clippy::missing_errors_doc)]
    pub fn set_level(&self, level: LogLevel) -> Result<(), LogConfigError> {
        if !self.dynamic {
            return Err(LogConfigError::DynamicLevelDisabled);
        }
        if level > self.ceiling {
            return Err(LogConfigError::AboveCeiling {
                requested: level,
                ceiling: self.ceiling,
            });
        }
        self.current.store(level as u8, Ordering::Relaxed);
        tracing::debug!("Mesh log level set to {:?}", level);
        Ok(())
    }

    /// Whether a line at `level` passes the current level
    #[must_use]
    pub fn allows(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self.level()
    }
}
