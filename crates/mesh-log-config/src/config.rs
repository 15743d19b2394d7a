//! Logging configuration surface of the mesh stack

use crate::error::LogConfigError;
use serde::{Deserialize, Serialize};

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LogOutput {
    /// Logging disabled
    None = 0,
    /// Debug UART
    DebugUart = 1,
    /// Application-provided sink
    App = 2,
    /// Platform-defined sink
    #[default]
    PlatformDefined = 3,
    /// Spinel `STREAM_LOG` property on NCP builds
    NcpSpinel = 4,
}

impl TryFrom<u8> for LogOutput {
    type Error = LogConfigError;

    fn try_from(value: u8) -> Result<Self, LogConfigError> {
        match value {
            0 => Ok(LogOutput::None),
            1 => Ok(LogOutput::DebugUart),
            2 => Ok(LogOutput::App),
            3 => Ok(LogOutput::PlatformDefined),
            4 => Ok(LogOutput::NcpSpinel),
            v => Err(LogConfigError::UnknownOutput(v)),
        }
    }
}

/// Severity scale, least verbose first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LogLevel {
    None = 0,
    #[default]
    Crit = 1,
    Warn = 2,
    Note = 3,
    Info = 4,
    Debg = 5,
}

impl LogLevel {
    /// Prefix written in front of a line when level prepending is on
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::None => "",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Note => "[NOTE]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debg => "[DEBG]",
        }
    }

    /// Matching `tracing` filter directive
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::None => "off",
            LogLevel::Crit => "error",
            LogLevel::Warn => "warn",
            LogLevel::Note | LogLevel::Info => "info",
            LogLevel::Debg => "debug",
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LogConfigError;

    fn try_from(value: u8) -> Result<Self, LogConfigError> {
        match value {
            0 => Ok(LogLevel::None),
            1 => Ok(LogLevel::Crit),
            2 => Ok(LogLevel::Warn),
            3 => Ok(LogLevel::Note),
            4 => Ok(LogLevel::Info),
            5 => Ok(LogLevel::Debg),
            v => Err(LogConfigError::UnknownLevel(v)),
        }
    }
}

/// Subsystem a log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRegion {
    Api,
    Mle,
    /// Address resolution / neighbor table
    Arp,
    NetData,
    Icmp,
    Ip6,
    Mac,
    Mem,
    PktDump,
    NetDiag,
    Platform,
    Cli,
    Coap,
    Core,
    Util,
}

impl LogRegion {
    pub const ALL: [LogRegion; 15] = [
        LogRegion::Api,
        LogRegion::Mle,
        LogRegion::Arp,
        LogRegion::NetData,
        LogRegion::Icmp,
        LogRegion::Ip6,
        LogRegion::Mac,
        LogRegion::Mem,
        LogRegion::PktDump,
        LogRegion::NetDiag,
        LogRegion::Platform,
        LogRegion::Cli,
        LogRegion::Coap,
        LogRegion::Core,
        LogRegion::Util,
    ];

    /// Fixed-width region tag written when region prepending is on
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            LogRegion::Api => "-API-----: ",
            LogRegion::Mle => "-MLE-----: ",
            LogRegion::Arp => "-ARP-----: ",
            LogRegion::NetData => "-N-DATA--: ",
            LogRegion::Icmp => "-ICMP----: ",
            LogRegion::Ip6 => "-IP6-----: ",
            LogRegion::Mac => "-MAC-----: ",
            LogRegion::Mem => "-MEM-----: ",
            LogRegion::PktDump => "-DUMP----: ",
            LogRegion::NetDiag => "-DIAG----: ",
            LogRegion::Platform => "-PLAT----: ",
            LogRegion::Cli => "-CLI-----: ",
            LogRegion::Coap => "-COAP----: ",
            LogRegion::Core => "-CORE----: ",
            LogRegion::Util => "-UTIL----: ",
        }
    }
}

/// Per-region enable flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegionToggles {
    pub api: bool,
    pub mle: bool,
    pub arp: bool,
    pub net_data: bool,
    pub icmp: bool,
    pub ip6: bool,
    pub mac: bool,
    pub mem: bool,
    pub pkt_dump: bool,
    pub net_diag: bool,
    pub platform: bool,
    pub cli: bool,
    pub coap: bool,
    pub core: bool,
    pub util: bool,
}

impl Default for RegionToggles {
    fn default() -> Self {
        Self {
            api: true,
            mle: true,
            arp: true,
            net_data: true,
            icmp: true,
            ip6: true,
            mac: true,
            mem: true,
            pkt_dump: true,
            net_diag: true,
            platform: false,
            cli: true,
            coap: true,
            core: true,
            util: true,
        }
    }
}

impl RegionToggles {
    #[must_use]
    pub fn enabled(&self, region: LogRegion) -> bool {
        match region {
            LogRegion::Api => self.api,
            LogRegion::Mle => self.mle,
            LogRegion::Arp => self.arp,
            LogRegion::NetData => self.net_data,
            LogRegion::Icmp => self.icmp,
            LogRegion::Ip6 => self.ip6,
            LogRegion::Mac => self.mac,
            LogRegion::Mem => self.mem,
            LogRegion::PktDump => self.pkt_dump,
            LogRegion::NetDiag => self.net_diag,
            LogRegion::Platform => self.platform,
            LogRegion::Cli => self.cli,
            LogRegion::Coap => self.coap,
            LogRegion::Core => self.core,
            LogRegion::Util => self.util,
        }
    }
}

/// Complete logging configuration
///
/// Missing JSON fields take the stack defaults: platform-defined output,
/// critical-only ceiling, static level, every region except platform on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LogConfig {
    pub output: LogOutput,
    /// Ceiling fixed at build time
    pub level: LogLevel,
    /// Allow lowering the level at runtime
    pub dynamic_level: bool,
    /// Level in effect at start-up (defaults to the ceiling)
    pub initial_level: Option<LogLevel>,
    pub regions: RegionToggles,
    pub prepend_level: bool,
    pub prepend_region: bool,
    /// Appended to every line, e.g. "\r"
    pub suffix: String,
    /// Include source/destination addresses in IPv6 message logs
    pub src_dst_ip_addresses: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: LogOutput::default(),
            level: LogLevel::default(),
            dynamic_level: false,
            initial_level: None,
            regions: RegionToggles::default(),
            prepend_level: true,
            prepend_region: true,
            suffix: String::new(),
            src_dst_ip_addresses: true,
        }
    }
}

impl LogConfig {
    /// Parse and validate a configuration from JSON
    #[allow(clippy::missing_errors_doc)]
    pub fn from_json(json: &str) -> Result<Self, LogConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    #[allow(clippy::missing_errors_doc)]
    pub fn validate(&self) -> Result<(), LogConfigError> {
        if let Some(initial) = self.initial_level {
            if initial > self.level {
                return Err(LogConfigError::InitialAboveCeiling {
                    initial,
                    ceiling: self.level,
                });
            }
        }
        Ok(())
    }

    /// Level in effect at start-up
    #[must_use]
    pub fn initial_level(&self) -> LogLevel {
        self.initial_level.unwrap_or(self.level)
    }

    /// `tracing` filter directive: `host_default` for everything, the
    /// configured ceiling for the `mesh` target
    #[must_use]
    pub fn env_filter_directive(&self, host_default: &str) -> String {
        let mesh = if self.output == LogOutput::None {
            LogLevel::None
        } else {
            self.level
        };
        format!("{host_default},mesh={}", mesh.directive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.output, LogOutput::PlatformDefined);
        assert_eq!(config.level, LogLevel::Crit);
        assert!(!config.dynamic_level);
        assert_eq!(config.initial_level(), LogLevel::Crit);
        assert!(config.prepend_level);
        assert!(config.prepend_region);
        assert!(config.suffix.is_empty());

        for region in LogRegion::ALL {
            assert_eq!(
                config.regions.enabled(region),
                region != LogRegion::Platform,
                "{region:?}"
            );
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LogConfig::from_json(
            r#"{ "output": "debug_uart", "level": "info", "regions": { "mac": false } }"#,
        )
        .unwrap();

        assert_eq!(config.output, LogOutput::DebugUart);
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.regions.enabled(LogRegion::Mac));
        assert!(config.regions.enabled(LogRegion::Mle));
        assert!(!config.regions.enabled(LogRegion::Platform));
    }

    #[test]
    fn test_initial_level_above_ceiling() {
        let result = LogConfig::from_json(r#"{ "level": "warn", "initial_level": "debg" }"#);
        assert!(matches!(
            result,
            Err(LogConfigError::InitialAboveCeiling {
                initial: LogLevel::Debg,
                ceiling: LogLevel::Warn,
            })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            LogConfig::from_json(r#"{ "level": "loud" }"#),
            Err(LogConfigError::Json(_))
        ));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::None < LogLevel::Crit);
        assert!(LogLevel::Crit < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debg);
        assert_eq!(LogLevel::try_from(3).unwrap(), LogLevel::Note);
        assert!(matches!(
            LogLevel::try_from(6),
            Err(LogConfigError::UnknownLevel(6))
        ));
    }

    #[test]
    fn test_output_values() {
        assert_eq!(LogOutput::try_from(4).unwrap(), LogOutput::NcpSpinel);
        assert_eq!(LogOutput::NcpSpinel as u8, 4);
        assert!(matches!(
            LogOutput::try_from(9),
            Err(LogConfigError::UnknownOutput(9))
        ));
    }

    #[test]
    fn test_env_filter_directive() {
        let mut config = LogConfig::default();
        assert_eq!(config.env_filter_directive("info"), "info,mesh=error");

        config.level = LogLevel::Debg;
        assert_eq!(config.env_filter_directive("warn"), "warn,mesh=debug");

        config.output = LogOutput::None;
        assert_eq!(config.env_filter_directive("info"), "info,mesh=off");
    }

    #[test]
    fn test_toggle_regions() {
        let toggles: RegionToggles =
            serde_json::from_str(r#"{ "platform": true, "coap": false }"#).unwrap();
        assert!(toggles.enabled(LogRegion::Platform));
        assert!(!toggles.enabled(LogRegion::Coap));
        assert!(toggles.enabled(LogRegion::Mle));
    }
}
