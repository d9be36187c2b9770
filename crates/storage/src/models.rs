//! Storage models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A profile row: resident, admin, SCR operator or integrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Identity-provider id (opaque string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Raw phone as typed into the profile form. May be missing or garbage;
    /// normalization happens at the recipient-resolution layer.
    pub phone: Option<String>,
    /// Role slug: "resident", "admin", "scr" or "integrator".
    pub role: String,
    /// Neighborhood the profile belongs to, if any.
    pub neighborhood_id: Option<String>,
    /// Whether an admin approved the registration.
    pub approved: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// A neighborhood row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Neighborhood {
    pub id: String,
    /// Display name used in message templates.
    pub name: String,
    pub created_at: String,
}

/// A persisted panic-button event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: String,
    /// Kind slug: "panic", "danger", "suspicious" or "ok".
    pub kind: String,
    pub actor_id: String,
    pub actor_name: String,
    pub neighborhood_id: Option<String>,
    pub note: Option<String>,
    /// "open" or "resolved".
    pub status: String,
    pub created_at: String,
}

/// A community chat feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: String,
    pub neighborhood_id: Option<String>,
    /// Absent for system rows.
    pub sender_id: Option<String>,
    pub sender_name: String,
    pub body: String,
    /// System rows mirror engine events into the feed.
    pub is_system: bool,
    pub created_at: String,
}

/// A ledger row for one outbound fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationRecord {
    pub id: String,
    /// Event kind slug ("panic_alert", "admin_broadcast", ...).
    pub kind: String,
    /// Rendered body; null until dispatch for rows persisted up front.
    pub body: Option<String>,
    /// Numbers targeted; null until dispatch.
    pub target_count: Option<i64>,
    pub created_at: String,
}

/// A VIP service request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: String,
    pub resident_id: String,
    pub resident_name: String,
    pub neighborhood_id: String,
    /// Kind slug: "escort", "extra_round" or "travel_notice".
    pub kind: String,
    /// "pending" or "done".
    pub status: String,
    pub created_at: String,
}

/// A patrol check-in row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PatrolLog {
    pub id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub neighborhood_id: Option<String>,
    pub note: String,
    /// Set when the check-in was about a specific resident.
    pub target_resident_id: Option<String>,
    pub created_at: String,
}
