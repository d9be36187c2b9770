//! Typed events consumed by the fan-out pipeline.
//!
//! Each trigger surface builds exactly one of these and hands it to the
//! pipeline; the event is consumed within that single invocation. The
//! formatter matches exhaustively on the tag, so adding a variant forces
//! every template decision at compile time.

use serde::{Deserialize, Serialize};

use crate::ids;

/// Profile role, stored in the `profiles.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    Admin,
    /// Motorcycle patrol operator (serviço comunitário de ronda).
    Scr,
    Integrator,
}

impl Role {
    /// Column value used by the profile store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Admin => "admin",
            Self::Scr => "scr",
            Self::Integrator => "integrator",
        }
    }

    /// Portuguese display label used in message bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resident => "Morador",
            Self::Admin => "Administrador",
            Self::Scr => "Motovigia",
            Self::Integrator => "Integrador",
        }
    }
}

/// Severity of a panic-button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicKind {
    Panic,
    Danger,
    Suspicious,
    Ok,
}

impl PanicKind {
    /// Column value used by the alert store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Danger => "danger",
            Self::Suspicious => "suspicious",
            Self::Ok => "ok",
        }
    }
}

/// VIP service offered to residents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Escort,
    ExtraRound,
    TravelNotice,
}

impl ServiceKind {
    /// Column value used by the service-request store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Escort => "escort",
            Self::ExtraRound => "extra_round",
            Self::TravelNotice => "travel_notice",
        }
    }

    /// Portuguese display label used in message bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Escort => "Escolta",
            Self::ExtraRound => "Ronda Extra",
            Self::TravelNotice => "Aviso de Viagem",
        }
    }
}

/// Audience requested for an admin broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastScope {
    All,
    AdminsOnly,
    Neighborhood,
}

/// Panic-button press (or its milder variants).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicAlert {
    pub kind: PanicKind,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: Role,
    pub neighborhood_id: Option<String>,
    pub note: Option<String>,
}

/// Patrol operator check-in with a free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolCheckIn {
    pub operator_id: String,
    pub operator_name: String,
    pub neighborhood_id: Option<String>,
    pub note: String,
    pub target_resident_id: Option<String>,
}

/// How a patrol check-in is routed, inferred from the note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolCategory {
    /// Incident language in the note; broadcast to the whole neighborhood.
    Critical,
    /// Infrastructure language; routed to the neighborhood's admins.
    Maintenance,
    /// Check-in on a specific resident.
    Targeted,
    /// Plain round; logged and sent to the community default destination.
    Routine,
}

/// Note keywords that escalate a check-in to a neighborhood-wide alert.
const CRITICAL_KEYWORDS: [&str; 3] = ["VIOLAÇÃO", "SUSPEITO", "VEÍCULO"];

/// Note keywords that route a check-in to the admins instead.
const MAINTENANCE_KEYWORDS: [&str; 3] = ["LUZ", "PORTÃO", "LÂMPADA"];

impl PatrolCheckIn {
    /// Classify the check-in from its note and target.
    ///
    /// Substring match on the uppercased note, critical keywords checked
    /// before maintenance ones, both before the targeted shape. A note
    /// containing both "LUZ" and "SUSPEITO" is therefore critical.
    pub fn category(&self) -> PatrolCategory {
        let note = self.note.to_uppercase();

        if CRITICAL_KEYWORDS.iter().any(|k| note.contains(k)) {
            return PatrolCategory::Critical;
        }
        if MAINTENANCE_KEYWORDS.iter().any(|k| note.contains(k)) {
            return PatrolCategory::Maintenance;
        }
        if ids::usable_id(self.target_resident_id.as_deref()).is_some() {
            return PatrolCategory::Targeted;
        }

        PatrolCategory::Routine
    }
}

/// New signup awaiting admin approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub pending_user_id: String,
    pub pending_user_name: String,
    pub role: Role,
    pub neighborhood_name: String,
}

/// VIP service request from a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub resident_id: String,
    pub resident_name: String,
    pub neighborhood_id: String,
    pub kind: ServiceKind,
}

/// Security notice sent to a user after a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginNotice {
    pub user_id: String,
    pub user_name: String,
    /// Phone captured at login time; the stored profile phone is the
    /// fallback when this is absent or unusable.
    pub phone: Option<String>,
}

/// Free-text announcement from the administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminBroadcast {
    pub text: String,
    pub scope: BroadcastScope,
    pub neighborhood_id: Option<String>,
}

/// Everything the pipeline knows how to fan out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Panic(PanicAlert),
    Patrol(PatrolCheckIn),
    Registration(RegistrationRequest),
    Service(ServiceRequest),
    Login(LoginNotice),
    Broadcast(AdminBroadcast),
}

impl Event {
    /// Tag written to the notification ledger.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Panic(_) => "panic_alert",
            Self::Patrol(_) => "patrol",
            Self::Registration(_) => "registration",
            Self::Service(_) => "service_request",
            Self::Login(_) => "login_notice",
            Self::Broadcast(_) => "admin_broadcast",
        }
    }
}
