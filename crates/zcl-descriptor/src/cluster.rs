//! ZCL (Zigbee Cluster Library) cluster descriptors

use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};

/// Cluster identifier, namespaced by the ZCL
pub type ClusterId = u16;

/// Manufacturer code ZBOSS uses to mean "no manufacturer extension"
pub const MANUF_CODE_INVALID: u16 = 0xFFFF;

/// Common ZCL cluster IDs
pub mod id {
    use super::ClusterId;

    // General Clusters
    pub const BASIC: ClusterId = 0x0000;
    pub const POWER_CONFIG: ClusterId = 0x0001;
    pub const DEVICE_TEMP: ClusterId = 0x0002;
    pub const IDENTIFY: ClusterId = 0x0003;
    pub const GROUPS: ClusterId = 0x0004;
    pub const SCENES: ClusterId = 0x0005;
    pub const ON_OFF: ClusterId = 0x0006;
    pub const ON_OFF_SWITCH_CONFIG: ClusterId = 0x0007;
    pub const LEVEL_CONTROL: ClusterId = 0x0008;
    pub const ALARMS: ClusterId = 0x0009;
    pub const TIME: ClusterId = 0x000A;
    pub const OTA_UPGRADE: ClusterId = 0x0019;
    pub const POLL_CONTROL: ClusterId = 0x0020;

    // Closures Clusters
    pub const DOOR_LOCK: ClusterId = 0x0101;
    pub const WINDOW_COVERING: ClusterId = 0x0102;

    // HVAC Clusters
    pub const THERMOSTAT: ClusterId = 0x0201;
    pub const FAN_CONTROL: ClusterId = 0x0202;

    // Lighting Clusters
    pub const COLOR_CONTROL: ClusterId = 0x0300;
    pub const BALLAST_CONFIG: ClusterId = 0x0301;

    // Measurement Clusters
    pub const ILLUMINANCE_MEASUREMENT: ClusterId = 0x0400;
    pub const TEMPERATURE_MEASUREMENT: ClusterId = 0x0402;
    pub const PRESSURE_MEASUREMENT: ClusterId = 0x0403;
    pub const HUMIDITY_MEASUREMENT: ClusterId = 0x0405;
    pub const OCCUPANCY_SENSING: ClusterId = 0x0406;

    // Security Clusters
    pub const IAS_ZONE: ClusterId = 0x0500;
    pub const IAS_ACE: ClusterId = 0x0501;
    pub const IAS_WD: ClusterId = 0x0502;

    // Smart Energy
    pub const METERING: ClusterId = 0x0702;
    pub const ELECTRICAL_MEASUREMENT: ClusterId = 0x0B04;
}

/// Basic cluster attributes
pub mod basic_attrs {
    pub const ZCL_VERSION: u16 = 0x0000;
    pub const APPLICATION_VERSION: u16 = 0x0001;
    pub const STACK_VERSION: u16 = 0x0002;
    pub const HW_VERSION: u16 = 0x0003;
    pub const MANUFACTURER_NAME: u16 = 0x0004;
    pub const MODEL_IDENTIFIER: u16 = 0x0005;
    pub const DATE_CODE: u16 = 0x0006;
    pub const POWER_SOURCE: u16 = 0x0007;
    pub const SW_BUILD_ID: u16 = 0x4000;
}

/// Identify cluster attributes
pub mod identify_attrs {
    pub const IDENTIFY_TIME: u16 = 0x0000;
}

/// Role a cluster instance plays on its endpoint
///
/// Server clusters are the endpoint's input clusters, client clusters its
/// output clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ClusterRole {
    Server = 0x01,
    Client = 0x02,
}

impl TryFrom<u8> for ClusterRole {
    type Error = DescriptorError;

    fn try_from(value: u8) -> Result<Self, DescriptorError> {
        match value {
            0x01 => Ok(ClusterRole::Server),
            0x02 => Ok(ClusterRole::Client),
            v => Err(DescriptorError::UnknownClusterRole(v)),
        }
    }
}

/// ZCL Direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    ClientToServer = 0x00,
    ServerToClient = 0x01,
}

impl Direction {
    /// Role of the cluster instance a command travelling this way is addressed to
    #[must_use]
    pub fn target_role(self) -> ClusterRole {
        match self {
            Direction::ClientToServer => ClusterRole::Server,
            Direction::ServerToClient => ClusterRole::Client,
        }
    }
}

/// ZCL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DataType {
    NoData = 0x00,
    Data8 = 0x08,
    Data16 = 0x09,
    Boolean = 0x10,
    Bitmap8 = 0x18,
    Bitmap16 = 0x19,
    Uint8 = 0x20,
    Uint16 = 0x21,
    Uint32 = 0x23,
    Int8 = 0x28,
    Int16 = 0x29,
    Int32 = 0x2B,
    Enum8 = 0x30,
    Enum16 = 0x31,
    Float32 = 0x39,
    String = 0x42,
    Array = 0x48,
    Struct = 0x4C,
    Ieee = 0xF0,
}

/// Attribute access bits, as the stack stores them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Access(pub u8);

impl Access {
    pub const READ_ONLY: Access = Access(0x01);
    pub const WRITE_ONLY: Access = Access(0x02);
    pub const READ_WRITE: Access = Access(0x03);
    pub const REPORTING: Access = Access(0x04);
    pub const SCENE: Access = Access(0x10);
    pub const MANUF_SPEC: Access = Access(0x20);

    #[must_use]
    pub fn contains(self, other: Access) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One entry of an externally owned attribute list
///
/// The descriptor model never reads attribute values; storage lives with
/// whoever supplied the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDesc {
    pub id: u16,
    pub data_type: DataType,
    #[serde(default)]
    pub access: Access,
}

impl AttributeDesc {
    #[must_use]
    pub const fn new(id: u16, data_type: DataType, access: Access) -> Self {
        Self {
            id,
            data_type,
            access,
        }
    }
}

/// One cluster instance on an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterDescriptor<'a> {
    pub id: ClusterId,
    pub role: ClusterRole,
    pub attr_count: u16,
    pub attributes: &'a [AttributeDesc],
    pub manuf_code: Option<u16>,
}

impl<'a> ClusterDescriptor<'a> {
    /// Look up an attribute by id in the borrowed attribute list
    #[must_use]
    pub fn attribute(&self, attr_id: u16) -> Option<&'a AttributeDesc> {
        self.attributes.iter().find(|a| a.id == attr_id)
    }

    #[must_use]
    pub fn is_manufacturer_specific(&self) -> bool {
        self.manuf_code.is_some()
    }
}

/// Input to the cluster table builder
///
/// `attr_count` is declared separately from the list, mirroring static
/// declarations where the two can drift apart.
#[derive(Debug, Clone, Copy)]
pub struct ClusterSpec<'a> {
    pub id: ClusterId,
    pub role: ClusterRole,
    pub attributes: &'a [AttributeDesc],
    pub attr_count: u16,
    pub manuf_code: Option<u16>,
}

impl<'a> ClusterSpec<'a> {
    /// Server cluster whose declared count is taken from the list
    #[must_use]
    pub fn server(id: ClusterId, attributes: &'a [AttributeDesc]) -> Self {
        Self::new(id, ClusterRole::Server, attributes)
    }

    /// Client cluster, usually without attributes
    #[must_use]
    pub fn client(id: ClusterId) -> Self {
        Self::new(id, ClusterRole::Client, &[])
    }

    #[must_use]
    pub fn new(id: ClusterId, role: ClusterRole, attributes: &'a [AttributeDesc]) -> Self {
        Self {
            id,
            role,
            attributes,
            attr_count: u16::try_from(attributes.len()).unwrap_or(u16::MAX),
            manuf_code: None,
        }
    }

    /// Build from a raw ZBOSS role byte
    #[allow(clippy::missing_errors_doc)]
    pub fn from_raw_role(
        id: ClusterId,
        role: u8,
        attributes: &'a [AttributeDesc],
    ) -> Result<Self, DescriptorError> {
        Ok(Self::new(id, ClusterRole::try_from(role)?, attributes))
    }

    /// Override the declared attribute count
    #[must_use]
    pub fn with_attr_count(mut self, attr_count: u16) -> Self {
        self.attr_count = attr_count;
        self
    }

    /// Set the manufacturer code; [`MANUF_CODE_INVALID`] clears it
    #[must_use]
    pub fn with_manuf_code(mut self, code: u16) -> Self {
        self.manuf_code = (code != MANUF_CODE_INVALID).then_some(code);
        self
    }
}
