//! Home Automation profile constants and device presets

/// ZCL profile IDs
pub mod profiles {
    pub const ZDO: u16 = 0x0000;
    pub const HOME_AUTOMATION: u16 = 0x0104;
    pub const SMART_ENERGY: u16 = 0x0109;
    pub const LIGHT_LINK: u16 = 0xC05E;
}

/// HA device type IDs
pub mod device_id {
    pub const ON_OFF_SWITCH: u16 = 0x0000;
    pub const LEVEL_CONTROL_SWITCH: u16 = 0x0001;
    pub const ON_OFF_OUTPUT: u16 = 0x0002;
    pub const LEVEL_CONTROLLABLE_OUTPUT: u16 = 0x0003;
    pub const SCENE_SELECTOR: u16 = 0x0004;
    pub const CONFIGURATION_TOOL: u16 = 0x0005;
    pub const REMOTE_CONTROL: u16 = 0x0006;
    pub const COMBINED_INTERFACE: u16 = 0x0007;
    pub const RANGE_EXTENDER: u16 = 0x0008;
    pub const MAINS_POWER_OUTLET: u16 = 0x0009;
    pub const DOOR_LOCK: u16 = 0x000A;
    pub const SIMPLE_SENSOR: u16 = 0x000C;
    pub const ON_OFF_LIGHT: u16 = 0x0100;
    pub const DIMMABLE_LIGHT: u16 = 0x0101;
    pub const COLOR_DIMMABLE_LIGHT: u16 = 0x0102;
    pub const DIMMER_SWITCH: u16 = 0x0104;
    pub const LIGHT_SENSOR: u16 = 0x0106;
    pub const OCCUPANCY_SENSOR: u16 = 0x0107;
    pub const SHADE: u16 = 0x0200;
    pub const THERMOSTAT: u16 = 0x0301;
    pub const TEMPERATURE_SENSOR: u16 = 0x0302;
    pub const IAS_ZONE: u16 = 0x0402;
}

/// Scene Selector: Identify + Basic servers, Scenes + Groups clients
pub mod scene_selector {
    use super::{device_id, profiles};
    use crate::cluster::{id, AttributeDesc, ClusterSpec};
    use crate::context::DeviceContext;
    use crate::endpoint::EndpointDescriptor;
    use crate::error::DescriptorError;
    use crate::simple_desc::SimpleDescriptor;
    use crate::table::ClusterTable;

    pub const DEVICE_ID: u16 = device_id::SCENE_SELECTOR;
    pub const DEVICE_VERSION: u8 = 0;
    pub const IN_CLUSTER_NUM: usize = 2;
    pub const OUT_CLUSTER_NUM: usize = 2;
    pub const CLUSTER_NUM: usize = IN_CLUSTER_NUM + OUT_CLUSTER_NUM;
    pub const REPORT_ATTR_COUNT: usize = 0;

    /// Cluster table over caller-owned Basic and Identify attribute lists
    #[allow(clippy::missing_errors_doc)]
    pub fn cluster_table<'a>(
        basic_attrs: &'a [AttributeDesc],
        identify_attrs: &'a [AttributeDesc],
    ) -> Result<ClusterTable<'a>, DescriptorError> {
        ClusterTable::builder(IN_CLUSTER_NUM, OUT_CLUSTER_NUM)
            .cluster(ClusterSpec::server(id::IDENTIFY, identify_attrs))
            .cluster(ClusterSpec::server(id::BASIC, basic_attrs))
            .cluster(ClusterSpec::client(id::SCENES))
            .cluster(ClusterSpec::client(id::GROUPS))
            .build()
    }

    /// Scene selector endpoint on the HA profile
    #[allow(clippy::missing_errors_doc)]
    pub fn endpoint(
        ep: u8,
        table: ClusterTable<'_>,
    ) -> Result<EndpointDescriptor<'_>, DescriptorError> {
        let desc = SimpleDescriptor::from_table(
            &table,
            ep,
            profiles::HOME_AUTOMATION,
            DEVICE_ID,
            DEVICE_VERSION,
        )?;
        EndpointDescriptor::compose(desc, table)
    }

    /// Device context with the scene selector as its only endpoint
    #[allow(clippy::missing_errors_doc)]
    pub fn context(endpoint: EndpointDescriptor<'_>) -> Result<DeviceContext<'_>, DescriptorError> {
        DeviceContext::from_endpoints([endpoint])
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::cluster::{basic_attrs, identify_attrs, Access, DataType};
        use crate::discovery;

        const BASIC: [AttributeDesc; 2] = [
            AttributeDesc::new(basic_attrs::ZCL_VERSION, DataType::Uint8, Access::READ_ONLY),
            AttributeDesc::new(basic_attrs::POWER_SOURCE, DataType::Enum8, Access::READ_ONLY),
        ];
        const IDENTIFY: [AttributeDesc; 1] = [AttributeDesc::new(
            identify_attrs::IDENTIFY_TIME,
            DataType::Uint16,
            Access::READ_WRITE,
        )];

        #[test]
        fn test_scene_selector_discovery_record() {
            let table = cluster_table(&BASIC, &IDENTIFY).unwrap();
            assert_eq!(table.len(), CLUSTER_NUM);

            let ctx = context(endpoint(1, table).unwrap()).unwrap();
            let records = ctx.discovery_records();
            assert_eq!(records.len(), 1);

            let desc = discovery::deserialize(&records[0].1).unwrap();
            assert_eq!(desc.in_clusters(), &[0x0003, 0x0000]);
            assert_eq!(desc.out_clusters(), &[0x0005, 0x0004]);
            assert_eq!(desc.device_id(), DEVICE_ID);
            assert_eq!(desc.profile_id(), profiles::HOME_AUTOMATION);
        }

        #[test]
        fn test_scene_selector_rejects_reserved_endpoint() {
            let table = cluster_table(&BASIC, &IDENTIFY).unwrap();
            assert_eq!(
                endpoint(0, table).map(|ep| ep.endpoint()),
                Err(DescriptorError::InvalidEndpointNumber(0))
            );
        }

        #[test]
        fn test_attribute_lists_are_borrowed() {
            let table = cluster_table(&BASIC, &IDENTIFY).unwrap();
            let basic = table
                .find(id::BASIC, crate::cluster::ClusterRole::Server)
                .unwrap();
            assert_eq!(basic.attr_count, 2);
            assert!(basic.attribute(basic_attrs::POWER_SOURCE).is_some());
        }
    }
}
