//! Event trigger routes.
//!
//! Each handler persists the event, detaches the fan-out and answers with
//! the durable record id. Clients never wait for gateway deliveries.

use axum::extract::State;
use axum::Json;
use broadcast::{LoginNotice, PanicAlert, PatrolCheckIn, RegistrationRequest, ServiceRequest};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Receipt returned by every trigger route.
#[derive(Serialize)]
pub struct TriggerResponse {
    pub record_id: String,
}

/// Record a panic-button press and notify the actor's neighborhood.
pub async fn panic(
    State(state): State<AppState>,
    Json(alert): Json<PanicAlert>,
) -> Result<Json<TriggerResponse>> {
    let receipt = state.pipeline.notify_panic(alert).await?;
    receipt.fanout.detach();
    Ok(Json(TriggerResponse {
        record_id: receipt.record_id,
    }))
}

/// Record a patrol check-in and notify its audience.
pub async fn patrol(
    State(state): State<AppState>,
    Json(check_in): Json<PatrolCheckIn>,
) -> Result<Json<TriggerResponse>> {
    let receipt = state.pipeline.notify_patrol(check_in).await?;
    receipt.fanout.detach();
    Ok(Json(TriggerResponse {
        record_id: receipt.record_id,
    }))
}

/// Record a pending registration and notify the admins.
pub async fn registration(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<Json<TriggerResponse>> {
    let receipt = state.pipeline.notify_registration(request).await?;
    receipt.fanout.detach();
    Ok(Json(TriggerResponse {
        record_id: receipt.record_id,
    }))
}

/// Record a VIP service request and notify the patrol operators.
pub async fn service_request(
    State(state): State<AppState>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<TriggerResponse>> {
    let receipt = state.pipeline.notify_service_request(request).await?;
    receipt.fanout.detach();
    Ok(Json(TriggerResponse {
        record_id: receipt.record_id,
    }))
}

/// Record a login and send the security notice to the account's phone.
pub async fn login(
    State(state): State<AppState>,
    Json(notice): Json<LoginNotice>,
) -> Result<Json<TriggerResponse>> {
    let receipt = state.pipeline.notify_login(notice).await?;
    receipt.fanout.detach();
    Ok(Json(TriggerResponse {
        record_id: receipt.record_id,
    }))
}
