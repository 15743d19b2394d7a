//! Descriptor construction errors
//!
//! Every variant describes an inconsistent static device declaration. None of
//! them are transient, so callers abort device start-up instead of retrying.

use crate::cluster::{ClusterId, ClusterRole};
use thiserror::Error;

/// Errors raised while building or decoding device descriptors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Declared attribute count disagrees with the supplied attribute list
    #[error("Malformed attribute list for cluster {cluster:#06x}: declared {declared} attributes, list has {actual}")]
    MalformedAttributeList {
        cluster: ClusterId,
        declared: u16,
        actual: usize,
    },

    /// Same cluster id registered twice with the same role
    #[error("Duplicate {role:?} cluster {cluster:#06x}")]
    DuplicateClusterRole {
        cluster: ClusterId,
        role: ClusterRole,
    },

    /// Raw role byte is neither server nor client
    #[error("Unknown cluster role: {0:#04x}")]
    UnknownClusterRole(u8),

    /// Number of server/client clusters differs from the declared count
    #[error("Cluster count mismatch for {role:?} clusters: declared {declared}, table has {actual}")]
    ClusterCountMismatch {
        role: ClusterRole,
        declared: usize,
        actual: usize,
    },

    /// More clusters than a one-byte count can describe
    #[error("Too many {role:?} clusters for a simple descriptor: {len}")]
    ClusterListTooLong { role: ClusterRole, len: usize },

    #[error("Invalid endpoint number: {0} (expected 1-240)")]
    InvalidEndpointNumber(u8),

    #[error("Invalid device version: {0} (expected 0-15)")]
    InvalidDeviceVersion(u8),

    /// Simple descriptor id list diverges from the cluster table
    #[error("Descriptor mismatch on endpoint {endpoint} ({role:?}): descriptor lists {declared:04x?}, cluster table has {table:04x?}")]
    DescriptorMismatch {
        endpoint: u8,
        role: ClusterRole,
        declared: Vec<ClusterId>,
        table: Vec<ClusterId>,
    },

    #[error("Endpoint {0} is already registered")]
    DuplicateEndpoint(u8),

    #[error("Discovery record too short: {0} bytes")]
    RecordTooShort(usize),

    #[error("Discovery record has {0} trailing bytes")]
    TrailingBytes(usize),
}
