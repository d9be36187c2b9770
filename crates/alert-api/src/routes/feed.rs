//! Read feeds consumed by the mobile clients.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use storage::{Alert, ChatMessage, NotificationRecord, PatrolLog, ServiceRequest};

use crate::error::Result;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;

/// Common query parameters for feed routes.
#[derive(Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub neighborhood_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl FeedQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200)
    }
}

/// Latest alerts, optionally scoped to one neighborhood.
pub async fn recent_alerts(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<Alert>>> {
    let alerts = storage::alert::recent_alerts(
        state.storage.pool(),
        query.neighborhood_id.as_deref(),
        query.limit(),
    )
    .await?;
    Ok(Json(alerts))
}

/// Latest fan-out ledger rows.
pub async fn recent_notifications(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<NotificationRecord>>> {
    let rows =
        storage::notification::recent_notifications(state.storage.pool(), query.limit()).await?;
    Ok(Json(rows))
}

/// Latest patrol check-ins, optionally scoped to one neighborhood.
pub async fn recent_patrol_logs(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PatrolLog>>> {
    let logs = storage::patrol::recent_patrol_logs(
        state.storage.pool(),
        query.neighborhood_id.as_deref(),
        query.limit(),
    )
    .await?;
    Ok(Json(logs))
}

/// Service requests still waiting for an operator.
pub async fn pending_service_requests(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ServiceRequest>>> {
    let pending = storage::service_request::pending_service_requests(
        state.storage.pool(),
        query.neighborhood_id.as_deref(),
    )
    .await?;
    Ok(Json(pending))
}

/// Neighborhood chat feed, system mirrors included.
pub async fn chat_feed(
    State(state): State<AppState>,
    Path(neighborhood_id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    let messages = storage::chat::recent_messages(
        state.storage.pool(),
        &neighborhood_id,
        query.limit(),
    )
    .await?;
    Ok(Json(messages))
}
