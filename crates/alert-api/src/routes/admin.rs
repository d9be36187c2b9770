//! Admin routes: announcements, approvals, neighborhoods and record
//! lifecycle updates.

use axum::extract::{Path, State};
use axum::Json;
use broadcast::{BroadcastReceipt, BroadcastScope};
use serde::{Deserialize, Serialize};
use storage::{Alert, Neighborhood, Profile};
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Request to send an official announcement.
#[derive(Deserialize)]
pub struct BroadcastRequest {
    pub text: String,
    pub scope: BroadcastScope,
    #[serde(default)]
    pub neighborhood_id: Option<String>,
}

/// Request to send the channel-check message.
#[derive(Deserialize)]
pub struct TestMessageRequest {
    pub number: String,
}

/// Gateway response for a test send.
#[derive(Serialize)]
pub struct TestMessageResponse {
    pub response: String,
}

/// Request to create a neighborhood.
#[derive(Deserialize)]
pub struct CreateNeighborhoodRequest {
    pub id: String,
    pub name: String,
}

/// Request to rename a neighborhood.
#[derive(Deserialize)]
pub struct RenameNeighborhoodRequest {
    pub name: String,
}

/// Status echo for updates with no full record to return.
#[derive(Serialize)]
pub struct UpdateResponse {
    pub id: String,
    pub status: String,
}

/// Send an official announcement to the selected audience. Synchronous:
/// the response carries the targeted count.
pub async fn send_broadcast(
    State(state): State<AppState>,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<BroadcastReceipt>> {
    let receipt = state
        .pipeline
        .send_broadcast(&req.text, req.scope, req.neighborhood_id.as_deref())
        .await?;
    Ok(Json(receipt))
}

/// Send the channel-check message to one number and wait for the gateway.
pub async fn test_message(
    State(state): State<AppState>,
    Json(req): Json<TestMessageRequest>,
) -> Result<Json<TestMessageResponse>> {
    let response = state.pipeline.send_test_message(&req.number).await?;
    Ok(Json(TestMessageResponse { response }))
}

/// Registrations waiting for approval.
pub async fn pending_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>> {
    let pending = storage::profile::list_pending_profiles(state.storage.pool()).await?;
    Ok(Json(pending))
}

/// Approve a pending registration.
pub async fn approve_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    storage::profile::set_profile_approved(state.storage.pool(), &id, true).await?;
    let profile = storage::profile::get_profile(state.storage.pool(), &id).await?;
    info!(profile = %id, "Registration approved");
    Ok(Json(profile))
}

/// Mark an alert as resolved.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Alert>> {
    storage::alert::set_alert_status(state.storage.pool(), &id, "resolved").await?;
    let alert = storage::alert::get_alert(state.storage.pool(), &id).await?;
    Ok(Json(alert))
}

/// Mark a service request as done.
pub async fn complete_service_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResponse>> {
    storage::service_request::set_service_request_status(state.storage.pool(), &id, "done")
        .await?;
    Ok(Json(UpdateResponse {
        id,
        status: "done".to_string(),
    }))
}

/// All neighborhoods.
pub async fn list_neighborhoods(
    State(state): State<AppState>,
) -> Result<Json<Vec<Neighborhood>>> {
    let hoods = storage::neighborhood::list_neighborhoods(state.storage.pool()).await?;
    Ok(Json(hoods))
}

/// Create a neighborhood.
pub async fn create_neighborhood(
    State(state): State<AppState>,
    Json(req): Json<CreateNeighborhoodRequest>,
) -> Result<Json<Neighborhood>> {
    storage::neighborhood::create_neighborhood(state.storage.pool(), &req.id, &req.name).await?;
    state.cache.invalidate().await;
    let hood = storage::neighborhood::get_neighborhood(state.storage.pool(), &req.id).await?;
    Ok(Json(hood))
}

/// Rename a neighborhood and drop the cached display names so the next
/// message body picks up the new one.
pub async fn rename_neighborhood(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameNeighborhoodRequest>,
) -> Result<Json<Neighborhood>> {
    storage::neighborhood::rename_neighborhood(state.storage.pool(), &id, &req.name).await?;
    state.cache.invalidate().await;
    let hood = storage::neighborhood::get_neighborhood(state.storage.pool(), &id).await?;
    info!(neighborhood = %id, "Neighborhood renamed");
    Ok(Json(hood))
}
