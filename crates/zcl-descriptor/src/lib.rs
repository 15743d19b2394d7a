//! Zigbee device descriptor model
//!
//! This crate declares a device's protocol surface (clusters, endpoints and
//! the device context) as validated, immutable tables, and produces the
//! discovery records the network framework sends to peers.

pub mod cluster;
pub mod context;
pub mod discovery;
pub mod endpoint;
pub mod error;
pub mod ha;
pub mod profile;
pub mod simple_desc;
pub mod table;
pub mod zdo;

pub use cluster::{
    Access, AttributeDesc, ClusterDescriptor, ClusterId, ClusterRole, ClusterSpec, DataType,
    Direction,
};
pub use context::DeviceContext;
pub use endpoint::{CvcAlarmSlot, EndpointDescriptor, ReportingSlot};
pub use error::DescriptorError;
pub use profile::DeviceProfile;
pub use simple_desc::SimpleDescriptor;
pub use table::{ClusterTable, ClusterTableBuilder};
pub use zdo::{ZdoError, ZdoResponder};
