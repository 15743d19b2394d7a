//! Endpoint descriptor: simple descriptor + cluster table for one endpoint

use crate::cluster::{ClusterDescriptor, ClusterId, ClusterRole};
use crate::error::DescriptorError;
use crate::simple_desc::SimpleDescriptor;
use crate::table::ClusterTable;

/// Reporting storage slot reserved for the stack
///
/// The descriptor model passes these through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportingSlot {
    pub cluster_id: ClusterId,
    pub attr_id: u16,
    pub min_interval: u16,
    pub max_interval: u16,
}

/// Level-control (CVC) alarm slot reserved for the stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CvcAlarmSlot {
    pub cluster_id: ClusterId,
    pub attr_id: u16,
}

/// One addressable endpoint of the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor<'a> {
    simple_desc: SimpleDescriptor,
    cluster_table: ClusterTable<'a>,
    reporting: Option<&'a [ReportingSlot]>,
    cvc_alarms: Option<&'a [CvcAlarmSlot]>,
}

impl<'a> EndpointDescriptor<'a> {
    /// Bind a simple descriptor to its cluster table
    ///
    /// The descriptor's input/output lists must equal the table's server/client
    /// ids element for element.
    #[allow(clippy::missing_errors_doc)]
    pub fn compose(
        simple_desc: SimpleDescriptor,
        cluster_table: ClusterTable<'a>,
    ) -> Result<Self, DescriptorError> {
        for role in [ClusterRole::Server, ClusterRole::Client] {
            let table_ids = cluster_table.ids(role);
            if simple_desc.clusters(role) != table_ids.as_slice() {
                return Err(DescriptorError::DescriptorMismatch {
                    endpoint: simple_desc.endpoint(),
                    role,
                    declared: simple_desc.clusters(role).to_vec(),
                    table: table_ids,
                });
            }
        }

        Ok(Self {
            simple_desc,
            cluster_table,
            reporting: None,
            cvc_alarms: None,
        })
    }

    /// Attach reporting storage
    #[must_use]
    pub fn with_reporting(mut self, slots: &'a [ReportingSlot]) -> Self {
        self.reporting = Some(slots);
        self
    }

    /// Attach CVC alarm storage
    #[must_use]
    pub fn with_cvc_alarms(mut self, slots: &'a [CvcAlarmSlot]) -> Self {
        self.cvc_alarms = Some(slots);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> u8 {
        self.simple_desc.endpoint()
    }

    #[must_use]
    pub fn profile_id(&self) -> u16 {
        self.simple_desc.profile_id()
    }

    #[must_use]
    pub fn simple_descriptor(&self) -> &SimpleDescriptor {
        &self.simple_desc
    }

    #[must_use]
    pub fn cluster_table(&self) -> &ClusterTable<'a> {
        &self.cluster_table
    }

    #[must_use]
    pub fn reporting(&self) -> Option<&'a [ReportingSlot]> {
        self.reporting
    }

    #[must_use]
    pub fn cvc_alarms(&self) -> Option<&'a [CvcAlarmSlot]> {
        self.cvc_alarms
    }

    /// Number of reserved reporting slots (0 without a reporting table)
    #[must_use]
    pub fn reporting_slots(&self) -> usize {
        self.reporting.map_or(0, <[_]>::len)
    }

    #[must_use]
    pub fn cluster(&self, id: ClusterId, role: ClusterRole) -> Option<&ClusterDescriptor<'a>> {
        self.cluster_table.find(id, role)
    }
}
