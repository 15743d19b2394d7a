//! Start-up configuration loading from JSON files

use mesh_log_config::{LogConfig, LogConfigError};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use zcl_descriptor::DeviceProfile;

/// Endpoint used for the built-in scene selector profile
pub const DEFAULT_ENDPOINT: u8 = 1;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid device profile: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("Invalid log config: {0}")]
    LogConfig(#[from] LogConfigError),
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    File,
    Default,
}

async fn read_optional(path: &Path) -> Result<Option<String>, LoadError> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LoadError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Load the logging configuration, falling back to the stack defaults
///
/// Runs before the subscriber exists, so it reports its source instead of logging.
pub async fn load_log_config(path: &Path) -> Result<(LogConfig, Source), LoadError> {
    match read_optional(path).await? {
        Some(contents) => Ok((LogConfig::from_json(&contents)?, Source::File)),
        None => Ok((LogConfig::default(), Source::Default)),
    }
}

/// Load the device profile, falling back to the built-in scene selector
///
/// A profile that exists but does not parse is an error: the device must not
/// start with a shape other than the one declared.
pub async fn load_profile(path: &Path) -> Result<DeviceProfile, LoadError> {
    match read_optional(path).await? {
        Some(contents) => {
            let profile = DeviceProfile::from_json(&contents)?;
            tracing::info!(
                "Loaded device profile with {} endpoint(s) from {:?}",
                profile.endpoints.len(),
                path
            );
            Ok(profile)
        }
        None => {
            tracing::info!(
                "No device profile at {:?}, using built-in scene selector on endpoint {}",
                path,
                DEFAULT_ENDPOINT
            );
            Ok(DeviceProfile::scene_selector(DEFAULT_ENDPOINT, 0x0000))
        }
    }
}
