//! Message body templates.
//!
//! One fixed template per event kind: an icon-prefixed bold title, the
//! kind's field lines in a fixed order, and a deep link back into the
//! application. Free text is inserted verbatim; the transport is plain
//! text and there is nothing to escape.

use std::sync::Arc;

use chrono::Local;
use storage::{Storage, StorageError};
use tracing::{debug, warn};

use crate::cache::NeighborhoodCache;
use crate::error::BroadcastError;
use crate::event::{
    AdminBroadcast, Event, LoginNotice, PanicAlert, PanicKind, PatrolCategory, PatrolCheckIn,
    RegistrationRequest, Role, ServiceRequest,
};
use crate::ids;

/// Deep links rendered into message footers.
#[derive(Debug, Clone)]
pub struct AppLinks {
    /// Login screen, the footer of almost every template.
    pub login_url: String,
    /// User management screen, the footer of registration notices.
    pub admin_users_url: String,
}

impl Default for AppLinks {
    fn default() -> Self {
        Self {
            login_url: "https://sentinela.app/login".to_string(),
            admin_users_url: "https://sentinela.app/admin/usuarios".to_string(),
        }
    }
}

/// Renders events into templated message bodies.
#[derive(Clone)]
pub struct MessageFormatter {
    cache: Arc<NeighborhoodCache>,
    storage: Storage,
    links: AppLinks,
}

impl MessageFormatter {
    pub fn new(cache: Arc<NeighborhoodCache>, storage: Storage, links: AppLinks) -> Self {
        Self {
            cache,
            storage,
            links,
        }
    }

    /// Render the body for an event.
    ///
    /// Fails only when a mandatory identifying field (a person's name) is
    /// missing; every other gap degrades to a placeholder.
    pub async fn format(&self, event: &Event) -> Result<String, BroadcastError> {
        match event {
            Event::Panic(alert) => self.format_panic(alert).await,
            Event::Patrol(check_in) => self.format_patrol(check_in).await,
            Event::Registration(request) => self.format_registration(request),
            Event::Service(request) => self.format_service(request).await,
            Event::Login(notice) => self.format_login(notice),
            Event::Broadcast(broadcast) => Ok(self.format_broadcast(broadcast)),
        }
    }

    /// Minimal degraded body used when a template cannot be rendered.
    pub fn fallback_body(&self) -> String {
        format!(
            "⚠️ *ALERTA SENTINELA*\n\nNovo evento registrado. Acesse o aplicativo para detalhes.\n\n🔗 Acesse: {}",
            self.links.login_url
        )
    }

    /// Body for the direct channel-check send.
    pub fn test_body(&self) -> String {
        format!(
            "✅ *TESTE SENTINELA*\n\nCanal de avisos operacional.\n\n🔗 Acesse: {}",
            self.links.login_url
        )
    }

    async fn format_panic(&self, alert: &PanicAlert) -> Result<String, BroadcastError> {
        let name = require_name(&alert.actor_name, "actor name")?;

        let title = match alert.kind {
            PanicKind::Panic => "🚨 *ALERTA DE PÂNICO*",
            PanicKind::Danger => "⚠️ *ALERTA DE PERIGO*",
            PanicKind::Suspicious => "👀 *ATIVIDADE SUSPEITA*",
            PanicKind::Ok => "✅ *TUDO CERTO*",
        };
        let title = if alert.actor_role == Role::Scr {
            format!("[SCR] {}", title)
        } else {
            title.to_string()
        };

        let location = self.location(alert.neighborhood_id.as_deref()).await;

        Ok(format!(
            "{}\n\n👤 {}: {}\n{}\n{}\n{}\n\n🔗 Acesse: {}",
            title,
            alert.actor_role.label(),
            name,
            location_line(&location),
            note_line(alert.note.as_deref()),
            opened_at_line(),
            self.links.login_url,
        ))
    }

    async fn format_patrol(&self, check_in: &PatrolCheckIn) -> Result<String, BroadcastError> {
        let operator = require_name(&check_in.operator_name, "operator name")?;
        let location = self.location(check_in.neighborhood_id.as_deref()).await;

        let body = match check_in.category() {
            PatrolCategory::Critical => format!(
                "🚨 *ALERTA DA RONDA*\n\n👤 Motovigia: {}\n{}\n{}\n{}\n\n🔗 Acesse: {}",
                operator,
                location_line(&location),
                note_line(Some(&check_in.note)),
                opened_at_line(),
                self.links.login_url,
            ),
            PatrolCategory::Maintenance => format!(
                "🔧 *MANUTENÇÃO*\n\n👤 Motovigia: {}\n{}\n{}\n\n🔗 Acesse: {}",
                operator,
                location_line(&location),
                note_line(Some(&check_in.note)),
                self.links.login_url,
            ),
            PatrolCategory::Targeted => {
                let resident = self.target_name(check_in.target_resident_id.as_deref()).await;
                format!(
                    "🏍️ *RONDA SCR*\n\n👤 Motovigia: {}\n🏠 Residência: {}\n{}\n{}\n{}\n\n🔗 Acesse: {}",
                    operator,
                    resident,
                    note_line(Some(&check_in.note)),
                    location_line(&location),
                    opened_at_line(),
                    self.links.login_url,
                )
            }
            PatrolCategory::Routine => format!(
                "🏍️ *RONDA SCR*\n\n👤 Motovigia: {}\n{}\n{}\n{}\n\n🔗 Acesse: {}",
                operator,
                location_line(&location),
                note_line(Some(&check_in.note)),
                opened_at_line(),
                self.links.login_url,
            ),
        };

        Ok(body)
    }

    fn format_registration(&self, request: &RegistrationRequest) -> Result<String, BroadcastError> {
        let name = require_name(&request.pending_user_name, "pending user name")?;

        let hood = request.neighborhood_name.trim();
        let hood = if hood.is_empty() { "(Global)" } else { hood };

        Ok(format!(
            "🔔 *NOVO CADASTRO*\n\n👤 Nome: {}\n🏷️ Perfil: {}\n📍 Local: {}\n\n🔗 Aprovar em: {}",
            name,
            request.role.label(),
            hood,
            self.links.admin_users_url,
        ))
    }

    async fn format_service(&self, request: &ServiceRequest) -> Result<String, BroadcastError> {
        let name = require_name(&request.resident_name, "resident name")?;

        // Residents have no street address on file; the neighborhood name
        // stands in for it.
        let address = self.location(Some(&request.neighborhood_id)).await;

        Ok(format!(
            "⭐ *SOLICITAÇÃO VIP*\n\n👤 Morador: {}\n🛎️ Serviço: {}\n📍 Endereço: {}\n{}\n\n🔗 Acesse: {}",
            name,
            request.kind.label(),
            address,
            opened_at_line(),
            self.links.login_url,
        ))
    }

    fn format_login(&self, notice: &LoginNotice) -> Result<String, BroadcastError> {
        let name = require_name(&notice.user_name, "user name")?;

        Ok(format!(
            "🔒 *AVISO DE SEGURANÇA*\n\n👤 Usuário: {}\n🕐 Acesso às {}\n\nSe não reconhece este acesso, contate a administração.\n\n🔗 Acesse: {}",
            name,
            Local::now().format("%H:%M"),
            self.links.login_url,
        ))
    }

    fn format_broadcast(&self, broadcast: &AdminBroadcast) -> String {
        format!(
            "📢 *COMUNICADO OFICIAL*\n\n{}\n\nEnviado pela administração central.\n🔗 Acesse: {}",
            broadcast.text.trim(),
            self.links.login_url,
        )
    }

    async fn location(&self, neighborhood_id: Option<&str>) -> String {
        match ids::usable_id(neighborhood_id) {
            Some(id) => self
                .cache
                .display_name(id)
                .await
                .unwrap_or_else(|| "(Global)".to_string()),
            None => "(Global)".to_string(),
        }
    }

    async fn target_name(&self, target_resident_id: Option<&str>) -> String {
        let Some(id) = ids::usable_id(target_resident_id) else {
            return "(não identificado)".to_string();
        };

        match storage::profile::get_profile(self.storage.pool(), id).await {
            Ok(profile) => profile.name,
            Err(StorageError::NotFound { .. }) => {
                debug!("No profile for patrol target {}", id);
                "(não identificado)".to_string()
            }
            Err(err) => {
                warn!("Failed to load patrol target {}: {}", id, err);
                "(não identificado)".to_string()
            }
        }
    }
}

fn location_line(location: &str) -> String {
    format!("📍 Local: {}", location)
}

fn note_line(note: Option<&str>) -> String {
    let note = note
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Sem descrição");
    format!("📝 Descrição: {}", note)
}

fn opened_at_line() -> String {
    format!("🕐 Aberto às {}", Local::now().format("%H:%M"))
}

fn require_name<'a>(name: &'a str, field: &'static str) -> Result<&'a str, BroadcastError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BroadcastError::Formatting(format!("missing {}", field)));
    }
    Ok(name)
}
