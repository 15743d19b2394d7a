//! Log line emission honouring a [`LogConfig`]

use crate::config::{LogConfig, LogLevel, LogOutput, LogRegion};
use crate::level::LogLevelControl;
use tracing::Level;

/// Formats mesh log lines and forwards them to `tracing` on the `mesh` target
#[derive(Debug)]
pub struct MeshLogger {
    config: LogConfig,
    control: LogLevelControl,
}

impl MeshLogger {
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        let control = LogLevelControl::new(&config);
        Self { config, control }
    }

    #[must_use]
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Runtime level handle
    #[must_use]
    pub fn control(&self) -> &LogLevelControl {
        &self.control
    }

    /// Render a line, or `None` when the configuration suppresses it
    #[must_use]
    pub fn format(&self, level: LogLevel, region: LogRegion, message: &str) -> Option<String> {
        if self.config.output == LogOutput::None
            || !self.control.allows(level)
            || !self.config.regions.enabled(region)
        {
            return None;
        }

        let mut line = String::with_capacity(
            message.len() + self.config.suffix.len() + 17,
        );
        if self.config.prepend_level {
            line.push_str(level.prefix());
        }
        if self.config.prepend_region {
            line.push_str(region.prefix());
        }
        line.push_str(message);
        line.push_str(&self.config.suffix);
        Some(line)
    }

    /// Emit a line through `tracing`
    pub fn log(&self, level: LogLevel, region: LogRegion, message: &str) {
        let Some(line) = self.format(level, region, message) else {
            return;
        };

        match level {
            LogLevel::None => {}
            LogLevel::Crit => tracing::event!(target: "mesh", Level::ERROR, region = ?region, "{}", line),
            LogLevel::Warn => tracing::event!(target: "mesh", Level::WARN, region = ?region, "{}", line),
            LogLevel::Note | LogLevel::Info => {
                tracing::event!(target: "mesh", Level::INFO, region = ?region, "{}", line);
            }
            LogLevel::Debg => tracing::event!(target: "mesh", Level::DEBUG, region = ?region, "{}", line),
        }
    }
}
