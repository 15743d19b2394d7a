//! Simple descriptor wire record
//!
//! Record format (all multi-byte fields little-endian):
//! ```text
//! [Endpoint: 1 byte]
//! [Profile ID: 2 bytes]
//! [Device ID: 2 bytes]
//! [Device version: 1 byte] (low nibble, high nibble reserved)
//! [Input cluster count: 1 byte]
//! [Input cluster IDs: 2 bytes each]
//! [Output cluster count: 1 byte]
//! [Output cluster IDs: 2 bytes each]
//! ```

use crate::cluster::ClusterId;
use crate::error::DescriptorError;
use crate::simple_desc::{SimpleDescriptor, MAX_DEVICE_VERSION};
use bytes::{Buf, BufMut};

/// endpoint(1) + profile(2) + device(2) + version(1) + in count(1) + out count(1)
pub const MIN_RECORD_SIZE: usize = 8;

/// Size of the serialized record
#[must_use]
pub fn encoded_len(desc: &SimpleDescriptor) -> usize {
    MIN_RECORD_SIZE + 2 * (desc.in_clusters.len() + desc.out_clusters.len())
}

/// Serialize a simple descriptor into its discovery record
#[must_use]
pub fn serialize(desc: &SimpleDescriptor) -> Vec<u8> {
    let mut data = Vec::with_capacity(encoded_len(desc));
    write_record(desc, &mut data);
    data
}

/// Append the discovery record to any buffer
///
/// Counts always fit one byte because descriptors are validated when built.
#[allow(clippy::cast_possible_truncation)]
pub fn write_record<B: BufMut>(desc: &SimpleDescriptor, buf: &mut B) {
    buf.put_u8(desc.endpoint);
    buf.put_u16_le(desc.profile_id);
    buf.put_u16_le(desc.device_id);
    buf.put_u8(desc.device_version & MAX_DEVICE_VERSION);

    for ids in [&desc.in_clusters, &desc.out_clusters] {
        buf.put_u8(ids.len() as u8);
        for &id in ids.iter() {
            buf.put_u16_le(id);
        }
    }
}

/// Parse a discovery record back into a validated simple descriptor
#[allow(clippy::missing_errors_doc)]
pub fn deserialize(data: &[u8]) -> Result<SimpleDescriptor, DescriptorError> {
    let mut buf = data;
    let desc = read_record(&mut buf, data.len())?;
    if buf.has_remaining() {
        return Err(DescriptorError::TrailingBytes(buf.remaining()));
    }
    Ok(desc)
}

/// Read one record from the front of `buf`, leaving anything after it
pub(crate) fn read_record(
    buf: &mut &[u8],
    total_len: usize,
) -> Result<SimpleDescriptor, DescriptorError> {
    if buf.remaining() < MIN_RECORD_SIZE - 1 {
        return Err(DescriptorError::RecordTooShort(total_len));
    }

    let endpoint = buf.get_u8();
    let profile_id = buf.get_u16_le();
    let device_id = buf.get_u16_le();
    let device_version = buf.get_u8() & MAX_DEVICE_VERSION;

    let in_clusters = read_cluster_list(buf, total_len)?;
    let out_clusters = read_cluster_list(buf, total_len)?;

    SimpleDescriptor::new(
        endpoint,
        profile_id,
        device_id,
        device_version,
        in_clusters,
        out_clusters,
    )
}

fn read_cluster_list(buf: &mut &[u8], total_len: usize) -> Result<Vec<ClusterId>, DescriptorError> {
    if !buf.has_remaining() {
        return Err(DescriptorError::RecordTooShort(total_len));
    }
    let count = usize::from(buf.get_u8());
    if buf.remaining() < count * 2 {
        return Err(DescriptorError::RecordTooShort(total_len));
    }
    Ok((0..count).map(|_| buf.get_u16_le()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{id, ClusterSpec};
    use crate::table::ClusterTable;

    fn scene_selector_desc() -> SimpleDescriptor {
        let table = ClusterTable::from_clusters([
            ClusterSpec::server(id::IDENTIFY, &[]),
            ClusterSpec::server(id::BASIC, &[]),
            ClusterSpec::client(id::SCENES),
            ClusterSpec::client(id::GROUPS),
        ])
        .unwrap();
        SimpleDescriptor::from_table(&table, 1, 0x0104, 0x0004, 0).unwrap()
    }

    #[test]
    fn test_scene_selector_record_bytes() {
        let record = serialize(&scene_selector_desc());
        assert_eq!(
            record,
            vec![
                0x01, // endpoint
                0x04, 0x01, // profile 0x0104
                0x04, 0x00, // device 0x0004
                0x00, // version
                0x02, 0x03, 0x00, 0x00, 0x00, // in: Identify, Basic
                0x02, 0x05, 0x00, 0x04, 0x00, // out: Scenes, Groups
            ]
        );
        assert_eq!(record.len(), encoded_len(&scene_selector_desc()));
    }

    #[test]
    fn test_roundtrip() {
        let desc = SimpleDescriptor::new(
            240,
            0xC05E,
            0x0210,
            15,
            vec![0x0000, 0x0003, 0x0004, 0x0005, 0x0006, 0x0008, 0x0300, 0xFC01],
            vec![0x0019],
        )
        .unwrap();
        assert_eq!(deserialize(&serialize(&desc)), Ok(desc));
    }

    #[test]
    fn test_empty_lists() {
        let desc = SimpleDescriptor::new(1, 0x0104, 0x0000, 0, Vec::new(), Vec::new()).unwrap();
        let record = serialize(&desc);
        assert_eq!(record.len(), MIN_RECORD_SIZE);
        assert_eq!(deserialize(&record), Ok(desc));
    }

    #[test]
    fn test_reserved_version_bits_ignored() {
        let mut record = serialize(&scene_selector_desc());
        record[5] = 0xA3;
        assert_eq!(deserialize(&record).unwrap().device_version(), 0x03);
    }

    #[test]
    fn test_truncated_record() {
        let record = serialize(&scene_selector_desc());
        for len in [0, 5, 7, 9, record.len() - 1] {
            assert_eq!(
                deserialize(&record[..len]),
                Err(DescriptorError::RecordTooShort(len))
            );
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut record = serialize(&scene_selector_desc());
        record.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(deserialize(&record), Err(DescriptorError::TrailingBytes(2)));
    }

    #[test]
    fn test_invalid_endpoint_in_record() {
        let mut record = serialize(&scene_selector_desc());
        record[0] = 0;
        assert_eq!(
            deserialize(&record),
            Err(DescriptorError::InvalidEndpointNumber(0))
        );
    }
}
