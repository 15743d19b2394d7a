//! ZDO discovery responder
//!
//! Answers the device-side half of endpoint discovery from a built
//! [`DeviceContext`]: Active Endpoints and Simple Descriptor requests.

use crate::context::DeviceContext;
use crate::discovery;
use crate::simple_desc::{MAX_ENDPOINT, MIN_ENDPOINT};
use bytes::{Buf, BufMut};
use thiserror::Error;

/// ZDO cluster IDs handled here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ZdoCluster {
    SimpleDescReq = 0x0004,
    ActiveEpReq = 0x0005,
    SimpleDescRsp = 0x8004,
    ActiveEpRsp = 0x8005,
}

impl ZdoCluster {
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0004 => Some(ZdoCluster::SimpleDescReq),
            0x0005 => Some(ZdoCluster::ActiveEpReq),
            0x8004 => Some(ZdoCluster::SimpleDescRsp),
            0x8005 => Some(ZdoCluster::ActiveEpRsp),
            _ => None,
        }
    }
}

/// ZDO response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ZdoStatus {
    Success = 0x00,
    DeviceNotFound = 0x81,
    InvalidEp = 0x82,
    NotActive = 0x83,
    NotSupported = 0x84,
}

/// ZDO request errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZdoError {
    #[error("ZDO request too short: {0} bytes")]
    RequestTooShort(usize),

    #[error("Unsupported ZDO cluster: {0:#06x}")]
    UnsupportedCluster(u16),
}

/// A response ready to be handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZdoResponse {
    pub cluster_id: u16,
    pub asdu: Vec<u8>,
}

/// Discovery responder bound to one device context
#[derive(Debug, Clone, Copy)]
pub struct ZdoResponder<'c, 'a> {
    ctx: &'c DeviceContext<'a>,
    nwk_addr: u16,
}

impl<'c, 'a> ZdoResponder<'c, 'a> {
    /// `nwk_addr` is this device's short address
    #[must_use]
    pub fn new(ctx: &'c DeviceContext<'a>, nwk_addr: u16) -> Self {
        Self { ctx, nwk_addr }
    }

    /// Dispatch a request ASDU by ZDO cluster id
    #[allow(clippy::missing_errors_doc)]
    pub fn handle(&self, cluster_id: u16, asdu: &[u8]) -> Result<ZdoResponse, ZdoError> {
        match ZdoCluster::from_u16(cluster_id) {
            Some(ZdoCluster::SimpleDescReq) => Ok(ZdoResponse {
                cluster_id: ZdoCluster::SimpleDescRsp as u16,
                asdu: self.simple_descriptor_response(asdu)?,
            }),
            Some(ZdoCluster::ActiveEpReq) => Ok(ZdoResponse {
                cluster_id: ZdoCluster::ActiveEpRsp as u16,
                asdu: self.active_endpoints_response(asdu)?,
            }),
            _ => Err(ZdoError::UnsupportedCluster(cluster_id)),
        }
    }

    /// Answer a Simple Descriptor Request
    ///
    /// Request: TSN (1) + NWK address of interest (2 LE) + endpoint (1).
    /// Response: TSN + status + NWK address (2 LE) + length (1) + record.
    /// A record longer than 255 bytes is answered with `NOT_SUPPORTED`.
    #[allow(clippy::missing_errors_doc)]
    pub fn simple_descriptor_response(&self, asdu: &[u8]) -> Result<Vec<u8>, ZdoError> {
        if asdu.len() < 4 {
            return Err(ZdoError::RequestTooShort(asdu.len()));
        }
        let mut buf = asdu;
        let tsn = buf.get_u8();
        let nwk_addr = buf.get_u16_le();
        let endpoint = buf.get_u8();

        let found = if nwk_addr != self.nwk_addr {
            Err(ZdoStatus::DeviceNotFound)
        } else if !(MIN_ENDPOINT..=MAX_ENDPOINT).contains(&endpoint) {
            Err(ZdoStatus::InvalidEp)
        } else {
            self.ctx
                .lookup(endpoint)
                .ok_or(ZdoStatus::NotActive)
                .and_then(|ep| {
                    let desc = ep.simple_descriptor();
                    let len = discovery::encoded_len(desc);
                    match u8::try_from(len) {
                        Ok(len) => Ok((desc, len)),
                        Err(_) => {
                            tracing::warn!(
                                "EP{} simple descriptor is {} bytes, too long for a Simple_Desc_rsp",
                                endpoint,
                                len
                            );
                            Err(ZdoStatus::NotSupported)
                        }
                    }
                })
        };

        let mut rsp = Vec::new();
        rsp.put_u8(tsn);
        match found {
            Ok((desc, len)) => {
                rsp.put_u8(ZdoStatus::Success as u8);
                rsp.put_u16_le(self.nwk_addr);
                rsp.put_u8(len);
                discovery::write_record(desc, &mut rsp);
                tracing::debug!("Simple descriptor request TSN={} EP{}: success", tsn, endpoint);
            }
            Err(status) => {
                rsp.put_u8(status as u8);
                rsp.put_u16_le(nwk_addr);
                rsp.put_u8(0);
                tracing::debug!(
                    "Simple descriptor request TSN={} EP{} for {:#06x}: {:?}",
                    tsn,
                    endpoint,
                    nwk_addr,
                    status
                );
            }
        }
        Ok(rsp)
    }

    /// Answer an Active Endpoints Request
    ///
    /// Request: TSN (1) + NWK address of interest (2 LE).
    /// Response: TSN + status + NWK address (2 LE) + count (1) + endpoints.
    #[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
    pub fn active_endpoints_response(&self, asdu: &[u8]) -> Result<Vec<u8>, ZdoError> {
        if asdu.len() < 3 {
            return Err(ZdoError::RequestTooShort(asdu.len()));
        }
        let mut buf = asdu;
        let tsn = buf.get_u8();
        let nwk_addr = buf.get_u16_le();

        let mut rsp = vec![tsn];
        if nwk_addr == self.nwk_addr {
            let endpoints = self.ctx.active_endpoints();
            rsp.put_u8(ZdoStatus::Success as u8);
            rsp.put_u16_le(self.nwk_addr);
            // At most 240 application endpoints exist
            rsp.put_u8(endpoints.len() as u8);
            rsp.extend_from_slice(&endpoints);
            tracing::debug!("Active endpoints request TSN={}: {:?}", tsn, endpoints);
        } else {
            rsp.put_u8(ZdoStatus::DeviceNotFound as u8);
            rsp.put_u16_le(nwk_addr);
            rsp.put_u8(0);
        }
        Ok(rsp)
    }
}
