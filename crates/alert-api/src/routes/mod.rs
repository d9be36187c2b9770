//! Route handlers for the alert API.

pub mod admin;
pub mod events;
pub mod feed;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Event triggers
        .route("/api/events/panic", post(events::panic))
        .route("/api/events/patrol", post(events::patrol))
        .route("/api/events/registration", post(events::registration))
        .route("/api/events/service-request", post(events::service_request))
        .route("/api/events/login", post(events::login))
        // Admin actions
        .route("/api/admin/broadcast", post(admin::send_broadcast))
        .route("/api/admin/test-message", post(admin::test_message))
        .route("/api/admin/registrations", get(admin::pending_registrations))
        .route("/api/admin/profiles/:id/approve", post(admin::approve_profile))
        .route("/api/admin/alerts/:id/resolve", post(admin::resolve_alert))
        .route(
            "/api/admin/service-requests/:id/done",
            post(admin::complete_service_request),
        )
        .route(
            "/api/admin/neighborhoods",
            get(admin::list_neighborhoods).post(admin::create_neighborhood),
        )
        .route(
            "/api/admin/neighborhoods/:id/rename",
            post(admin::rename_neighborhood),
        )
        // Read feeds
        .route("/api/alerts", get(feed::recent_alerts))
        .route("/api/notifications", get(feed::recent_notifications))
        .route("/api/patrol-logs", get(feed::recent_patrol_logs))
        .route("/api/service-requests/pending", get(feed::pending_service_requests))
        .route("/api/chat/:neighborhood_id", get(feed::chat_feed))
}
