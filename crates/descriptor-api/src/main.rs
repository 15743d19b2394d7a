//! Descriptor API - serves a device's endpoint descriptors and discovery records

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mesh_log_config::{LogLevel, LogRegion, MeshLogger};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zcl_descriptor::{
    discovery, Access, AttributeDesc, ClusterDescriptor, ClusterRole, DataType, DeviceContext,
    DeviceProfile, SimpleDescriptor, ZdoResponder,
};

mod loader;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<DeviceContext<'static>>,
    pub name: Option<String>,
    pub nwk_addr: u16,
    pub logger: Arc<MeshLogger>,
}

/// API response wrapper using serde_json::Value for flexibility
#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or(serde_json::Value::Null)),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Device summary
#[derive(Serialize)]
struct DeviceInfo {
    name: Option<String>,
    nwk_addr: u16,
    active_endpoints: Vec<u8>,
}

/// One attribute of a cluster
#[derive(Serialize)]
struct AttributeView {
    id: u16,
    data_type: DataType,
    readable: bool,
    writable: bool,
    reportable: bool,
}

impl From<&AttributeDesc> for AttributeView {
    fn from(attr: &AttributeDesc) -> Self {
        Self {
            id: attr.id,
            data_type: attr.data_type,
            readable: attr.access.contains(Access::READ_ONLY),
            writable: attr.access.contains(Access::WRITE_ONLY),
            reportable: attr.access.contains(Access::REPORTING),
        }
    }
}

/// One cluster of an endpoint
#[derive(Serialize)]
struct ClusterView {
    id: u16,
    role: ClusterRole,
    attr_count: u16,
    manufacturer_specific: bool,
    manuf_code: Option<u16>,
    attributes: Vec<AttributeView>,
}

impl From<&ClusterDescriptor<'_>> for ClusterView {
    fn from(c: &ClusterDescriptor<'_>) -> Self {
        Self {
            id: c.id,
            role: c.role,
            attr_count: c.attr_count,
            manufacturer_specific: c.is_manufacturer_specific(),
            manuf_code: c.manuf_code,
            attributes: c.attributes.iter().map(AttributeView::from).collect(),
        }
    }
}

/// Full endpoint view
#[derive(Serialize)]
struct EndpointView<'a> {
    simple_descriptor: &'a SimpleDescriptor,
    clusters: Vec<ClusterView>,
    reporting_slots: usize,
}

/// Raw ZDO request
#[derive(Deserialize)]
struct ZdoRequest {
    cluster_id: u16,
    /// Hex-encoded ASDU
    asdu: String,
}

/// Log level change request
#[derive(Deserialize)]
struct LogLevelRequest {
    level: LogLevel,
}

fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02X}")).collect()
}

/// Parse a hex string, ignoring spaces and colons
fn parse_hex(s: &str) -> Result<Vec<u8>, ()> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !matches!(b, b' ' | b':'))
        .collect();
    if digits.len() % 2 != 0 {
        return Err(());
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or(())
        })
        .collect()
}

/// Get device info
async fn device_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(DeviceInfo {
        name: state.name.clone(),
        nwk_addr: state.nwk_addr,
        active_endpoints: state.ctx.active_endpoints(),
    }))
}

/// List simple descriptors of all endpoints
async fn list_endpoints(State(state): State<AppState>) -> impl IntoResponse {
    let descriptors: Vec<&SimpleDescriptor> = state
        .ctx
        .endpoints()
        .map(|ep| ep.simple_descriptor())
        .collect();
    Json(ApiResponse::success(descriptors))
}

/// Get one endpoint with its cluster table
async fn get_endpoint(
    State(state): State<AppState>,
    Path(endpoint): Path<u8>,
) -> impl IntoResponse {
    match state.ctx.lookup(endpoint) {
        Some(ep) => {
            let view = EndpointView {
                simple_descriptor: ep.simple_descriptor(),
                clusters: ep.cluster_table().iter().map(ClusterView::from).collect(),
                reporting_slots: ep.reporting_slots(),
            };
            (StatusCode::OK, Json(ApiResponse::success(view)))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Endpoint not found")),
        ),
    }
}

/// Get the serialized discovery record of an endpoint
async fn endpoint_record(
    State(state): State<AppState>,
    Path(endpoint): Path<u8>,
) -> impl IntoResponse {
    match state.ctx.lookup(endpoint) {
        Some(ep) => {
            let record = discovery::serialize(ep.simple_descriptor());
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "endpoint": endpoint,
                    "record": to_hex(&record),
                    "length": record.len()
                }))),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Endpoint not found")),
        ),
    }
}

/// Answer a raw ZDO discovery request
async fn zdo_request(
    State(state): State<AppState>,
    Json(req): Json<ZdoRequest>,
) -> impl IntoResponse {
    let Ok(asdu) = parse_hex(&req.asdu) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Invalid hex ASDU")),
        );
    };

    match ZdoResponder::new(&state.ctx, state.nwk_addr).handle(req.cluster_id, &asdu) {
        Ok(rsp) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "cluster_id": rsp.cluster_id,
                "asdu": to_hex(&rsp.asdu)
            }))),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// Get the mesh log level
async fn get_log_level(State(state): State<AppState>) -> impl IntoResponse {
    let control = state.logger.control();
    Json(ApiResponse::success(serde_json::json!({
        "level": control.level(),
        "ceiling": control.ceiling(),
        "dynamic": state.logger.config().dynamic_level
    })))
}

/// Lower (or restore) the mesh log level
async fn set_log_level(
    State(state): State<AppState>,
    Json(req): Json<LogLevelRequest>,
) -> impl IntoResponse {
    match state.logger.control().set_level(req.level) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "level": req.level }))),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// Health check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/device", get(device_info))
        .route("/api/v1/endpoints", get(list_endpoints))
        .route("/api/v1/endpoints/:endpoint", get(get_endpoint))
        .route("/api/v1/endpoints/:endpoint/record", get(endpoint_record))
        .route("/api/v1/zdo", post(zdo_request))
        .route("/api/v1/log/level", get(get_log_level).put(set_log_level))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
    let log_config_path = std::env::var("LOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir.join("log_config.json"));
    let profile_path = std::env::var("DEVICE_PROFILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir.join("device_profile.json"));

    let (log_config, log_source) = loader::load_log_config(&log_config_path).await?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                log_config
                    .env_filter_directive("descriptor_api=debug,zcl_descriptor=debug,info")
                    .into()
            }),
        )
        .init();

    tracing::info!("Starting Descriptor API server");
    match log_source {
        loader::Source::File => tracing::info!("Loaded log config from {:?}", log_config_path),
        loader::Source::Default => tracing::debug!(
            "No log config at {:?}, using stack defaults",
            log_config_path
        ),
    }
    let logger = Arc::new(MeshLogger::new(log_config));

    // The profile owns attribute storage and must outlive the device context
    let profile: &'static DeviceProfile =
        Box::leak(Box::new(loader::load_profile(&profile_path).await?));
    let ctx = match profile.build_context() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Device profile rejected: {}", e);
            logger.log(LogLevel::Crit, LogRegion::Core, &format!("Device init failed: {e}"));
            return Err(e.into());
        }
    };

    for (endpoint, record) in ctx.discovery_records() {
        tracing::info!("EP{} discovery record: {}", endpoint, to_hex(&record));
    }
    logger.log(
        LogLevel::Note,
        LogRegion::Core,
        &format!("Device context ready, {} endpoint(s)", ctx.len()),
    );

    let state = AppState {
        ctx: Arc::new(ctx),
        name: profile.name.clone(),
        nwk_addr: profile.nwk_addr,
        logger,
    };

    // Start server
    let addr: std::net::SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| std::net::SocketAddr::from(([0, 0, 0, 0], 3000)));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zcl_descriptor::{ClusterSpec, ClusterTable};

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("01 2B:1a"), Ok(vec![0x01, 0x2B, 0x1A]));
        assert_eq!(parse_hex(""), Ok(Vec::new()));
        assert_eq!(parse_hex("012"), Err(()));
        assert_eq!(parse_hex("zz"), Err(()));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x01, 0x04, 0xAB]), "0104AB");
    }

    #[test]
    fn test_cluster_view() {
        let attrs = [
            AttributeDesc::new(0x0000, DataType::Uint16, Access::READ_WRITE),
            AttributeDesc::new(0x0001, DataType::Boolean, Access(0x05)),
        ];
        let spec = ClusterSpec::server(0x0003, &attrs).with_manuf_code(0x117C);
        let table = ClusterTable::from_clusters([spec]).unwrap();
        let view = ClusterView::from(table.find(0x0003, ClusterRole::Server).unwrap());

        assert!(view.manufacturer_specific);
        assert_eq!(view.attributes.len(), 2);
        assert!(view.attributes[0].readable && view.attributes[0].writable);
        assert!(!view.attributes[0].reportable);
        assert!(view.attributes[1].readable && view.attributes[1].reportable);
        assert!(!view.attributes[1].writable);
    }

    #[test]
    fn test_router_builds() {
        let profile: &'static DeviceProfile =
            Box::leak(Box::new(DeviceProfile::scene_selector(1, 0x0000)));
        let state = AppState {
            ctx: Arc::new(profile.build_context().unwrap()),
            name: profile.name.clone(),
            nwk_addr: profile.nwk_addr,
            logger: Arc::new(MeshLogger::new(mesh_log_config::LogConfig::default())),
        };
        let _app = app(state);
    }
}
