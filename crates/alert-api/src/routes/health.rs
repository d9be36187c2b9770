//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub gateway: String,
}

/// Health check. Gateway reachability is reported, never fatal.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let gateway = match state.gateway.health_check().await {
        Ok(true) => "ok",
        Ok(false) => "degraded",
        Err(_) => "unreachable",
    };

    Json(Health {
        status: "ok".to_string(),
        gateway: gateway.to_string(),
    })
}
