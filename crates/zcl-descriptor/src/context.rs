//! Device context: the registry of every endpoint a device exposes

use crate::cluster::{ClusterDescriptor, ClusterId, Direction};
use crate::discovery;
use crate::endpoint::EndpointDescriptor;
use crate::error::DescriptorError;
use std::collections::BTreeMap;

/// Root registry handed to the network framework at start-up
///
/// Endpoints are registered during initialization only. Once built the context
/// is read without locking, typically behind an `Arc`. Registering endpoints
/// after that point would need `register` to be serialized against readers,
/// e.g. by swapping in a rebuilt context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceContext<'a> {
    endpoints: BTreeMap<u8, EndpointDescriptor<'a>>,
}

impl<'a> DeviceContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a full endpoint list, all or nothing
    #[allow(clippy::missing_errors_doc)]
    pub fn from_endpoints<I>(endpoints: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = EndpointDescriptor<'a>>,
    {
        let mut ctx = Self::new();
        for endpoint in endpoints {
            ctx.register(endpoint)?;
        }
        Ok(ctx)
    }

    /// Register an endpoint; its number must not be taken yet
    #[allow(clippy::missing_errors_doc)]
    pub fn register(&mut self, endpoint: EndpointDescriptor<'a>) -> Result<(), DescriptorError> {
        let ep = endpoint.endpoint();
        if self.endpoints.contains_key(&ep) {
            tracing::warn!("Rejecting duplicate registration of endpoint {}", ep);
            return Err(DescriptorError::DuplicateEndpoint(ep));
        }

        tracing::info!(
            "Registered endpoint {}: profile={:#06x} device={:#06x} in={:04x?} out={:04x?}",
            ep,
            endpoint.profile_id(),
            endpoint.simple_descriptor().device_id(),
            endpoint.simple_descriptor().in_clusters(),
            endpoint.simple_descriptor().out_clusters()
        );
        self.endpoints.insert(ep, endpoint);
        Ok(())
    }

    #[must_use]
    pub fn lookup(&self, endpoint: u8) -> Option<&EndpointDescriptor<'a>> {
        self.endpoints.get(&endpoint)
    }

    /// Endpoints in ascending endpoint order
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDescriptor<'a>> {
        self.endpoints.values()
    }

    /// Registered endpoint numbers, ascending
    #[must_use]
    pub fn active_endpoints(&self) -> Vec<u8> {
        self.endpoints.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Resolve the cluster instance an incoming command is addressed to
    ///
    /// Client-to-server commands land on the server instance and
    /// server-to-client commands on the client instance.
    #[must_use]
    pub fn route(
        &self,
        endpoint: u8,
        cluster_id: ClusterId,
        direction: Direction,
    ) -> Option<&ClusterDescriptor<'a>> {
        self.lookup(endpoint)?
            .cluster(cluster_id, direction.target_role())
    }

    /// Serialized simple descriptor of every endpoint, ascending
    #[must_use]
    pub fn discovery_records(&self) -> Vec<(u8, Vec<u8>)> {
        self.endpoints
            .iter()
            .map(|(&ep, desc)| (ep, discovery::serialize(desc.simple_descriptor())))
            .collect()
    }
}
