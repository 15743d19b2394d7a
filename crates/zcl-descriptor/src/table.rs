//! Ordered cluster table of one endpoint

use crate::cluster::{ClusterDescriptor, ClusterId, ClusterRole, ClusterSpec};
use crate::error::DescriptorError;

/// Ordered cluster list attached to one endpoint
///
/// Table order is what peers see in discovery responses. The declared
/// server/client counts are fixed when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTable<'a> {
    clusters: Vec<ClusterDescriptor<'a>>,
    in_count: usize,
    out_count: usize,
}

impl<'a> ClusterTable<'a> {
    /// Start a table with fixed server (input) and client (output) counts
    #[must_use]
    pub fn builder(in_count: usize, out_count: usize) -> ClusterTableBuilder<'a> {
        ClusterTableBuilder {
            in_count,
            out_count,
            clusters: Vec::new(),
            error: None,
        }
    }

    /// Build a table whose counts are taken from the list itself
    #[allow(clippy::missing_errors_doc)]
    pub fn from_clusters<I>(specs: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = ClusterSpec<'a>>,
    {
        let specs: Vec<_> = specs.into_iter().collect();
        let in_count = specs
            .iter()
            .filter(|s| s.role == ClusterRole::Server)
            .count();
        let out_count = specs.len() - in_count;

        specs
            .into_iter()
            .fold(Self::builder(in_count, out_count), ClusterTableBuilder::cluster)
            .build()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Declared number of server clusters
    #[must_use]
    pub fn in_count(&self) -> usize {
        self.in_count
    }

    /// Declared number of client clusters
    #[must_use]
    pub fn out_count(&self) -> usize {
        self.out_count
    }

    /// All clusters in table order
    pub fn iter(&self) -> impl Iterator<Item = &ClusterDescriptor<'a>> {
        self.clusters.iter()
    }

    /// Clusters with the given role, in table order
    pub fn with_role(&self, role: ClusterRole) -> impl Iterator<Item = &ClusterDescriptor<'a>> {
        self.clusters.iter().filter(move |c| c.role == role)
    }

    pub fn server_clusters(&self) -> impl Iterator<Item = &ClusterDescriptor<'a>> {
        self.with_role(ClusterRole::Server)
    }

    pub fn client_clusters(&self) -> impl Iterator<Item = &ClusterDescriptor<'a>> {
        self.with_role(ClusterRole::Client)
    }

    /// Ids of the clusters with the given role, in table order
    #[must_use]
    pub fn ids(&self, role: ClusterRole) -> Vec<ClusterId> {
        self.with_role(role).map(|c| c.id).collect()
    }

    #[must_use]
    pub fn server_ids(&self) -> Vec<ClusterId> {
        self.ids(ClusterRole::Server)
    }

    #[must_use]
    pub fn client_ids(&self) -> Vec<ClusterId> {
        self.ids(ClusterRole::Client)
    }

    /// Find the cluster instance with this id and role
    #[must_use]
    pub fn find(&self, id: ClusterId, role: ClusterRole) -> Option<&ClusterDescriptor<'a>> {
        self.clusters.iter().find(|c| c.id == id && c.role == role)
    }
}

/// Incremental cluster table construction
///
/// The first validation failure is kept and reported by [`build`](Self::build).
#[derive(Debug)]
pub struct ClusterTableBuilder<'a> {
    in_count: usize,
    out_count: usize,
    clusters: Vec<ClusterDescriptor<'a>>,
    error: Option<DescriptorError>,
}

impl<'a> ClusterTableBuilder<'a> {
    /// Append a cluster
    #[must_use]
    pub fn cluster(mut self, spec: ClusterSpec<'a>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.push(spec) {
                self.error = Some(e);
            }
        }
        self
    }

    fn push(&mut self, spec: ClusterSpec<'a>) -> Result<(), DescriptorError> {
        if usize::from(spec.attr_count) != spec.attributes.len() {
            return Err(DescriptorError::MalformedAttributeList {
                cluster: spec.id,
                declared: spec.attr_count,
                actual: spec.attributes.len(),
            });
        }

        if self
            .clusters
            .iter()
            .any(|c| c.id == spec.id && c.role == spec.role)
        {
            return Err(DescriptorError::DuplicateClusterRole {
                cluster: spec.id,
                role: spec.role,
            });
        }

        self.clusters.push(ClusterDescriptor {
            id: spec.id,
            role: spec.role,
            attr_count: spec.attr_count,
            attributes: spec.attributes,
            manuf_code: spec.manuf_code,
        });
        Ok(())
    }

    /// Finish the table, checking the declared partition sizes
    #[allow(clippy::missing_errors_doc)]
    pub fn build(self) -> Result<ClusterTable<'a>, DescriptorError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        for (role, declared) in [
            (ClusterRole::Server, self.in_count),
            (ClusterRole::Client, self.out_count),
        ] {
            let actual = self.clusters.iter().filter(|c| c.role == role).count();
            if actual != declared {
                return Err(DescriptorError::ClusterCountMismatch {
                    role,
                    declared,
                    actual,
                });
            }
        }

        tracing::debug!(
            "Built cluster table: {} server, {} client clusters",
            self.in_count,
            self.out_count
        );

        Ok(ClusterTable {
            clusters: self.clusters,
            in_count: self.in_count,
            out_count: self.out_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{id, Access, AttributeDesc, DataType};

    const BASIC_ATTRS: [AttributeDesc; 2] = [
        AttributeDesc::new(0x0000, DataType::Uint8, Access::READ_ONLY),
        AttributeDesc::new(0x0007, DataType::Enum8, Access::READ_ONLY),
    ];
    const IDENTIFY_ATTRS: [AttributeDesc; 1] =
        [AttributeDesc::new(0x0000, DataType::Uint16, Access::READ_WRITE)];

    #[test]
    fn test_partition_preserves_order() {
        let table = ClusterTable::builder(2, 2)
            .cluster(ClusterSpec::server(id::IDENTIFY, &IDENTIFY_ATTRS))
            .cluster(ClusterSpec::client(id::SCENES))
            .cluster(ClusterSpec::server(id::BASIC, &BASIC_ATTRS))
            .cluster(ClusterSpec::client(id::GROUPS))
            .build()
            .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.server_ids(), vec![id::IDENTIFY, id::BASIC]);
        assert_eq!(table.client_ids(), vec![id::SCENES, id::GROUPS]);
        assert_eq!(
            table.server_clusters().count() + table.client_clusters().count(),
            table.len()
        );
    }

    #[test]
    fn test_duplicate_cluster_role() {
        let result = ClusterTable::builder(2, 0)
            .cluster(ClusterSpec::server(id::BASIC, &[]))
            .cluster(ClusterSpec::server(id::BASIC, &[]))
            .build();

        assert_eq!(
            result,
            Err(DescriptorError::DuplicateClusterRole {
                cluster: id::BASIC,
                role: ClusterRole::Server,
            })
        );
    }

    #[test]
    fn test_same_id_both_roles_allowed() {
        let table = ClusterTable::from_clusters([
            ClusterSpec::server(id::ON_OFF, &[]),
            ClusterSpec::client(id::ON_OFF),
        ])
        .unwrap();

        assert_eq!(table.in_count(), 1);
        assert_eq!(table.out_count(), 1);
        assert!(table.find(id::ON_OFF, ClusterRole::Server).is_some());
        assert!(table.find(id::ON_OFF, ClusterRole::Client).is_some());
    }

    #[test]
    fn test_malformed_attribute_list() {
        let result = ClusterTable::builder(1, 0)
            .cluster(ClusterSpec::server(id::BASIC, &BASIC_ATTRS).with_attr_count(3))
            .build();

        assert_eq!(
            result,
            Err(DescriptorError::MalformedAttributeList {
                cluster: id::BASIC,
                declared: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_declared_count_mismatch() {
        let result = ClusterTable::builder(1, 2)
            .cluster(ClusterSpec::server(id::BASIC, &BASIC_ATTRS))
            .cluster(ClusterSpec::client(id::SCENES))
            .build();

        assert_eq!(
            result,
            Err(DescriptorError::ClusterCountMismatch {
                role: ClusterRole::Client,
                declared: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_oversized_declared_count() {
        let result = ClusterTable::builder(usize::MAX, 1)
            .cluster(ClusterSpec::server(id::BASIC, &BASIC_ATTRS))
            .cluster(ClusterSpec::client(id::SCENES))
            .build();

        assert_eq!(
            result,
            Err(DescriptorError::ClusterCountMismatch {
                role: ClusterRole::Server,
                declared: usize::MAX,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_first_error_wins() {
        let result = ClusterTable::builder(1, 0)
            .cluster(ClusterSpec::server(id::BASIC, &BASIC_ATTRS).with_attr_count(0))
            .cluster(ClusterSpec::server(id::BASIC, &[]))
            .build();

        assert!(matches!(
            result,
            Err(DescriptorError::MalformedAttributeList { .. })
        ));
    }

    #[test]
    fn test_does_not_copy_attribute_lists() {
        let attrs = BASIC_ATTRS.to_vec();
        let table =
            ClusterTable::from_clusters([ClusterSpec::server(id::BASIC, &attrs)]).unwrap();
        let basic = table.find(id::BASIC, ClusterRole::Server).unwrap();
        assert!(std::ptr::eq(basic.attributes, attrs.as_slice()));
    }
}
