//! Service information and liveness endpoints.

use crate::models::GatewayInfo;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// `GET /`
///
/// Public. Reports that the gateway is running and which logical services
/// it forwards to.
pub async fn gateway_info(State(state): State<Arc<AppState>>) -> Json<GatewayInfo> {
    Json(GatewayInfo {
        message: "API Gateway is running".to_string(),
        available_services: state.proxy.registry().names(),
    })
}

/// `GET /health`
///
/// Liveness probe. Does not check backends.
pub async fn health_check() -> &'static str {
    "OK"
}
