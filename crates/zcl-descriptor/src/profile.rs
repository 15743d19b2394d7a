//! Declarative device profile
//!
//! A JSON description of a device's endpoints and clusters. The profile owns
//! the attribute lists and reserved slot storage; the [`DeviceContext`] built
//! from it borrows them, so the profile must outlive the context.

use crate::cluster::{
    basic_attrs, id, identify_attrs, Access, AttributeDesc, ClusterId, ClusterRole, ClusterSpec,
    DataType,
};
use crate::context::DeviceContext;
use crate::endpoint::{CvcAlarmSlot, EndpointDescriptor, ReportingSlot};
use crate::error::DescriptorError;
use crate::ha::{profiles, scene_selector};
use crate::simple_desc::SimpleDescriptor;
use crate::table::ClusterTable;
use serde::{de, Deserialize, Deserializer};

/// Most reporting or CVC slots one endpoint may reserve
pub const MAX_SLOTS: usize = 255;

/// Whole-device profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceProfile {
    /// Human-readable name, only used in logs
    #[serde(default)]
    pub name: Option<String>,
    /// Short address the ZDO responder answers for
    #[serde(default)]
    pub nwk_addr: u16,
    pub endpoints: Vec<EndpointProfile>,
}

/// One endpoint of the profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointProfile {
    pub endpoint: u8,
    #[serde(default = "default_profile_id")]
    pub profile_id: u16,
    pub device_id: u16,
    #[serde(default)]
    pub device_version: u8,
    /// Cluster table, in discovery order
    pub clusters: Vec<ClusterProfile>,
    /// Declared server cluster count (defaults to the number listed)
    #[serde(default)]
    pub in_count: Option<usize>,
    /// Declared client cluster count (defaults to the number listed)
    #[serde(default)]
    pub out_count: Option<usize>,
    /// Hand-declared input cluster list; derived from the table when absent
    #[serde(default)]
    pub in_clusters: Option<Vec<ClusterId>>,
    /// Hand-declared output cluster list; derived from the table when absent
    #[serde(default)]
    pub out_clusters: Option<Vec<ClusterId>>,
    #[serde(default, rename = "reporting_slots", deserialize_with = "slots_from_count")]
    pub reporting: Vec<ReportingSlot>,
    #[serde(default, rename = "cvc_slots", deserialize_with = "slots_from_count")]
    pub cvc_alarms: Vec<CvcAlarmSlot>,
}

/// One cluster of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterProfile {
    pub id: ClusterId,
    pub role: ClusterRole,
    #[serde(default)]
    pub attributes: Vec<AttributeDesc>,
    /// Declared attribute count (defaults to the number listed)
    #[serde(default)]
    pub attr_count: Option<u16>,
    #[serde(default)]
    pub manuf_code: Option<u16>,
}

fn default_profile_id() -> u16 {
    profiles::HOME_AUTOMATION
}

fn slots_from_count<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Clone,
{
    let count = usize::deserialize(deserializer)?;
    if count > MAX_SLOTS {
        return Err(de::Error::custom(format!(
            "{count} slots requested, at most {MAX_SLOTS} allowed"
        )));
    }
    Ok(vec![T::default(); count])
}

impl DeviceProfile {
    /// Parse a profile from JSON
    #[allow(clippy::missing_errors_doc)]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Single-endpoint scene selector with minimal Basic and Identify attributes
    #[must_use]
    pub fn scene_selector(endpoint: u8, nwk_addr: u16) -> Self {
        let cluster = |cluster_id, role, attributes: Vec<AttributeDesc>| ClusterProfile {
            id: cluster_id,
            role,
            attributes,
            attr_count: None,
            manuf_code: None,
        };

        Self {
            name: Some("Scene Selector".to_string()),
            nwk_addr,
            endpoints: vec![EndpointProfile {
                endpoint,
                profile_id: profiles::HOME_AUTOMATION,
                device_id: scene_selector::DEVICE_ID,
                device_version: scene_selector::DEVICE_VERSION,
                clusters: vec![
                    cluster(
                        id::IDENTIFY,
                        ClusterRole::Server,
                        vec![AttributeDesc::new(
                            identify_attrs::IDENTIFY_TIME,
                            DataType::Uint16,
                            Access::READ_WRITE,
                        )],
                    ),
                    cluster(
                        id::BASIC,
                        ClusterRole::Server,
                        vec![
                            AttributeDesc::new(
                                basic_attrs::ZCL_VERSION,
                                DataType::Uint8,
                                Access::READ_ONLY,
                            ),
                            AttributeDesc::new(
                                basic_attrs::POWER_SOURCE,
                                DataType::Enum8,
                                Access::READ_ONLY,
                            ),
                        ],
                    ),
                    cluster(id::SCENES, ClusterRole::Client, Vec::new()),
                    cluster(id::GROUPS, ClusterRole::Client, Vec::new()),
                ],
                in_count: Some(scene_selector::IN_CLUSTER_NUM),
                out_count: Some(scene_selector::OUT_CLUSTER_NUM),
                in_clusters: None,
                out_clusters: None,
                reporting: vec![ReportingSlot::default(); scene_selector::REPORT_ATTR_COUNT],
                cvc_alarms: Vec::new(),
            }],
        }
    }

    /// Build the device context, failing on the first inconsistency
    #[allow(clippy::missing_errors_doc)]
    pub fn build_context(&self) -> Result<DeviceContext<'_>, DescriptorError> {
        let endpoints = self
            .endpoints
            .iter()
            .map(EndpointProfile::build)
            .collect::<Result<Vec<_>, _>>()?;
        let ctx = DeviceContext::from_endpoints(endpoints)?;

        tracing::info!(
            "Built device context{} with {} endpoint(s)",
            self.name
                .as_deref()
                .map(|n| format!(" for {n}"))
                .unwrap_or_default(),
            ctx.len()
        );
        Ok(ctx)
    }
}

impl EndpointProfile {
    fn build(&self) -> Result<EndpointDescriptor<'_>, DescriptorError> {
        let in_count = self.in_count.unwrap_or_else(|| self.listed(ClusterRole::Server));
        let out_count = self.out_count.unwrap_or_else(|| self.listed(ClusterRole::Client));

        let table = self
            .clusters
            .iter()
            .map(ClusterProfile::spec)
            .fold(ClusterTable::builder(in_count, out_count), |b, spec| {
                b.cluster(spec)
            })
            .build()?;

        let desc = SimpleDescriptor::new(
            self.endpoint,
            self.profile_id,
            self.device_id,
            self.device_version,
            self.in_clusters.clone().unwrap_or_else(|| table.server_ids()),
            self.out_clusters.clone().unwrap_or_else(|| table.client_ids()),
        )?;

        let mut endpoint = EndpointDescriptor::compose(desc, table)?;
        if !self.reporting.is_empty() {
            endpoint = endpoint.with_reporting(&self.reporting);
        }
        if !self.cvc_alarms.is_empty() {
            endpoint = endpoint.with_cvc_alarms(&self.cvc_alarms);
        }
        Ok(endpoint)
    }

    fn listed(&self, role: ClusterRole) -> usize {
        self.clusters.iter().filter(|c| c.role == role).count()
    }
}

impl ClusterProfile {
    fn spec(&self) -> ClusterSpec<'_> {
        let mut spec = ClusterSpec::new(self.id, self.role, &self.attributes);
        if let Some(count) = self.attr_count {
            spec = spec.with_attr_count(count);
        }
        if let Some(code) = self.manuf_code {
            spec = spec.with_manuf_code(code);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery;

    const LIGHT_JSON: &str = r#"{
        "name": "Kitchen light",
        "nwk_addr": 4660,
        "endpoints": [
            {
                "endpoint": 11,
                "device_id": 256,
                "device_version": 1,
                "reporting_slots": 2,
                "clusters": [
                    { "id": 0, "role": "server", "attributes": [
                        { "id": 0, "data_type": "uint8", "access": 1 },
                        { "id": 7, "data_type": "enum8", "access": 1 }
                    ] },
                    { "id": 3, "role": "server", "attributes": [
                        { "id": 0, "data_type": "uint16", "access": 3 }
                    ] },
                    { "id": 6, "role": "server", "attributes": [
                        { "id": 0, "data_type": "boolean", "access": 5 }
                    ] },
                    { "id": 25, "role": "client", "manuf_code": 4476 }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_profile_from_json() {
        let profile = DeviceProfile::from_json(LIGHT_JSON).unwrap();
        assert_eq!(profile.nwk_addr, 0x1234);

        let ctx = profile.build_context().unwrap();
        let ep = ctx.lookup(11).unwrap();
        let desc = ep.simple_descriptor();

        assert_eq!(desc.profile_id(), profiles::HOME_AUTOMATION);
        assert_eq!(desc.in_clusters(), &[0x0000, 0x0003, 0x0006]);
        assert_eq!(desc.out_clusters(), &[0x0019]);
        assert_eq!(ep.reporting_slots(), 2);
        assert!(ep.cvc_alarms().is_none());

        let ota = ep.cluster(id::OTA_UPGRADE, ClusterRole::Client).unwrap();
        assert_eq!(ota.manuf_code, Some(4476));
    }

    #[test]
    fn test_scene_selector_preset() {
        let profile = DeviceProfile::scene_selector(1, 0x0000);
        let ctx = profile.build_context().unwrap();
        let records = ctx.discovery_records();
        assert_eq!(
            records[0].1,
            vec![
                0x01, 0x04, 0x01, 0x04, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x00, 0x02, 0x05,
                0x00, 0x04, 0x00,
            ]
        );
        assert_eq!(discovery::deserialize(&records[0].1).unwrap().endpoint(), 1);
    }

    #[test]
    fn test_hand_declared_lists_must_match() {
        // Same clusters as the table, but Basic listed before Identify
        let mut profile = DeviceProfile::scene_selector(1, 0x0000);
        profile.endpoints[0].in_clusters = Some(vec![id::BASIC, id::IDENTIFY]);

        assert!(matches!(
            profile.build_context(),
            Err(DescriptorError::DescriptorMismatch {
                endpoint: 1,
                role: ClusterRole::Server,
                ..
            })
        ));
    }

    #[test]
    fn test_declared_attr_count_checked() {
        let mut profile = DeviceProfile::scene_selector(1, 0x0000);
        profile.endpoints[0].clusters[1].attr_count = Some(5);

        assert_eq!(
            profile.build_context(),
            Err(DescriptorError::MalformedAttributeList {
                cluster: id::BASIC,
                declared: 5,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_declared_in_count_checked() {
        let mut profile = DeviceProfile::scene_selector(1, 0x0000);
        profile.endpoints[0].in_count = Some(3);

        assert!(matches!(
            profile.build_context(),
            Err(DescriptorError::ClusterCountMismatch {
                role: ClusterRole::Server,
                declared: 3,
                actual: 2,
            })
        ));
    }

    #[test]
    fn test_huge_in_count_is_a_mismatch() {
        let json = r#"{ "endpoints": [ { "endpoint": 1, "device_id": 4,
            "in_count": 18446744073709551615, "out_count": 1,
            "clusters": [
                { "id": 3, "role": "server" },
                { "id": 5, "role": "client" }
            ] } ] }"#;
        let profile = DeviceProfile::from_json(json).unwrap();

        assert_eq!(
            profile.build_context(),
            Err(DescriptorError::ClusterCountMismatch {
                role: ClusterRole::Server,
                declared: usize::MAX,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_slot_count_capped() {
        let json = |slots: usize| {
            format!(
                r#"{{ "endpoints": [ {{ "endpoint": 1, "device_id": 4,
                    "reporting_slots": {slots}, "clusters": [] }} ] }}"#
            )
        };

        let profile = DeviceProfile::from_json(&json(MAX_SLOTS)).unwrap();
        assert_eq!(profile.endpoints[0].reporting.len(), MAX_SLOTS);

        let err = DeviceProfile::from_json(&json(1_000_000)).unwrap_err();
        assert!(err.to_string().contains("at most 255"));
    }

    #[test]
    fn test_duplicate_endpoint_fails_whole_profile() {
        let mut profile = DeviceProfile::scene_selector(1, 0x0000);
        let second = profile.endpoints[0].clone();
        profile.endpoints.push(second);

        assert_eq!(
            profile.build_context(),
            Err(DescriptorError::DuplicateEndpoint(1))
        );
    }

    #[test]
    fn test_unknown_role_rejected_by_parser() {
        let json = r#"{ "endpoints": [ { "endpoint": 1, "device_id": 0,
            "clusters": [ { "id": 0, "role": "both" } ] } ] }"#;
        assert!(DeviceProfile::from_json(json).is_err());
    }
}
