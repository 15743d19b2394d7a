//! Simple descriptor: the per-endpoint discovery summary

use crate::cluster::{ClusterId, ClusterRole};
use crate::error::DescriptorError;
use crate::table::ClusterTable;
use serde::Serialize;

/// Lowest application endpoint (0 belongs to the ZDO)
pub const MIN_ENDPOINT: u8 = 1;
/// Highest application endpoint (241-254 reserved, 255 broadcast)
pub const MAX_ENDPOINT: u8 = 240;
/// Device version occupies the low nibble of its byte
pub const MAX_DEVICE_VERSION: u8 = 0x0F;

/// Fixed-shape endpoint summary used for service discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleDescriptor {
    pub(crate) endpoint: u8,
    pub(crate) profile_id: u16,
    pub(crate) device_id: u16,
    pub(crate) device_version: u8,
    pub(crate) in_clusters: Vec<ClusterId>,
    pub(crate) out_clusters: Vec<ClusterId>,
}

impl SimpleDescriptor {
    /// Derive a descriptor from a cluster table
    ///
    /// Input clusters are the table's server clusters and output clusters its
    /// client clusters, both in table order.
    #[allow(clippy::missing_errors_doc)]
    pub fn from_table(
        table: &ClusterTable<'_>,
        endpoint: u8,
        profile_id: u16,
        device_id: u16,
        device_version: u8,
    ) -> Result<Self, DescriptorError> {
        Self::new(
            endpoint,
            profile_id,
            device_id,
            device_version,
            table.server_ids(),
            table.client_ids(),
        )
    }

    /// Hand-declared descriptor
    ///
    /// Only field ranges are checked here; agreement with a cluster table is
    /// checked when the endpoint is composed.
    #[allow(clippy::missing_errors_doc)]
    pub fn new(
        endpoint: u8,
        profile_id: u16,
        device_id: u16,
        device_version: u8,
        in_clusters: Vec<ClusterId>,
        out_clusters: Vec<ClusterId>,
    ) -> Result<Self, DescriptorError> {
        check_endpoint(endpoint)?;
        if device_version > MAX_DEVICE_VERSION {
            return Err(DescriptorError::InvalidDeviceVersion(device_version));
        }
        check_list_len(ClusterRole::Server, &in_clusters)?;
        check_list_len(ClusterRole::Client, &out_clusters)?;

        Ok(Self {
            endpoint,
            profile_id,
            device_id,
            device_version,
            in_clusters,
            out_clusters,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> u8 {
        self.endpoint
    }

    #[must_use]
    pub fn profile_id(&self) -> u16 {
        self.profile_id
    }

    #[must_use]
    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    #[must_use]
    pub fn device_version(&self) -> u8 {
        self.device_version
    }

    /// Input (server) cluster ids
    #[must_use]
    pub fn in_clusters(&self) -> &[ClusterId] {
        &self.in_clusters
    }

    /// Output (client) cluster ids
    #[must_use]
    pub fn out_clusters(&self) -> &[ClusterId] {
        &self.out_clusters
    }

    #[must_use]
    pub fn clusters(&self, role: ClusterRole) -> &[ClusterId] {
        match role {
            ClusterRole::Server => &self.in_clusters,
            ClusterRole::Client => &self.out_clusters,
        }
    }

    /// Check if the endpoint lists a cluster on either side
    #[must_use]
    pub fn has_cluster(&self, cluster_id: ClusterId) -> bool {
        self.in_clusters.contains(&cluster_id) || self.out_clusters.contains(&cluster_id)
    }
}

/// Reject ZDO, reserved and broadcast endpoint numbers
#[allow(clippy::missing_errors_doc)]
pub fn check_endpoint(endpoint: u8) -> Result<(), DescriptorError> {
    if (MIN_ENDPOINT..=MAX_ENDPOINT).contains(&endpoint) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidEndpointNumber(endpoint))
    }
}

fn check_list_len(role: ClusterRole, ids: &[ClusterId]) -> Result<(), DescriptorError> {
    if ids.len() > usize::from(u8::MAX) {
        return Err(DescriptorError::ClusterListTooLong {
            role,
            len: ids.len(),
        });
    }
    Ok(())
}
