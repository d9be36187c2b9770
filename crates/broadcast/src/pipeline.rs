//! Event pipeline: persist, then fan out.
//!
//! Every entry point writes the durable record first and synchronously;
//! losing the record is the only unacceptable failure. The notification
//! fan-out (resolve, format, dispatch, side effects) runs in a spawned
//! task with its own error boundary, so a hung gateway or a bad template
//! never surfaces to the caller. The admin broadcast and the channel
//! check are the two exceptions: both are awaited by their caller.

use serde::Serialize;
use storage::Storage;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::dispatcher::{BroadcastDispatcher, DispatchReport};
use crate::error::BroadcastError;
use crate::event::{
    AdminBroadcast, BroadcastScope, Event, LoginNotice, PanicAlert, PanicKind, PatrolCategory,
    PatrolCheckIn, RegistrationRequest, Role, ServiceRequest,
};
use crate::formatter::MessageFormatter;
use crate::ids;
use crate::phone;
use crate::resolver::{RecipientResolver, RecipientSet};

/// What a detached fan-out accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    pub target_count: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl FanoutSummary {
    fn from_report(report: &DispatchReport) -> Self {
        let delivered = report.delivered();
        Self {
            target_count: report.target_count,
            delivered,
            failed: report.outcomes.len() - delivered,
        }
    }
}

/// Handle on a spawned fan-out task.
#[derive(Debug)]
pub struct FanoutTask {
    handle: JoinHandle<FanoutSummary>,
}

impl FanoutTask {
    /// Wait for the fan-out to finish. Tests and shutdown paths use this;
    /// request handlers detach instead.
    pub async fn join(self) -> FanoutSummary {
        match self.handle.await {
            Ok(summary) => summary,
            Err(err) => {
                error!("Fan-out task failed: {}", err);
                FanoutSummary::default()
            }
        }
    }

    /// Let the fan-out run unobserved.
    pub fn detach(self) {
        drop(self.handle);
    }
}

/// Receipt returned by the asynchronous entry points once the durable
/// record is written.
#[derive(Debug)]
pub struct FanoutReceipt {
    /// Id of the row written before the fan-out started.
    pub record_id: String,
    pub fanout: FanoutTask,
}

/// Result of the synchronous admin broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastReceipt {
    pub record_id: String,
    /// Numbers actually targeted; 0 when the scope resolved to nobody.
    pub sent_count: usize,
}

/// Orchestrates the persist, resolve, format, dispatch and mirror steps
/// for every event kind.
#[derive(Clone)]
pub struct AlertPipeline {
    storage: Storage,
    resolver: RecipientResolver,
    formatter: MessageFormatter,
    dispatcher: BroadcastDispatcher,
}

impl AlertPipeline {
    pub fn new(
        storage: Storage,
        resolver: RecipientResolver,
        formatter: MessageFormatter,
        dispatcher: BroadcastDispatcher,
    ) -> Self {
        Self {
            storage,
            resolver,
            formatter,
            dispatcher,
        }
    }

    /// Record a panic-button press and notify the actor's neighborhood.
    pub async fn notify_panic(&self, alert: PanicAlert) -> Result<FanoutReceipt, BroadcastError> {
        let record_id = Uuid::new_v4().to_string();
        storage::alert::insert_alert(
            self.storage.pool(),
            &record_id,
            alert.kind.as_str(),
            &alert.actor_id,
            &alert.actor_name,
            ids::usable_id(alert.neighborhood_id.as_deref()),
            alert.note.as_deref(),
        )
        .await?;
        info!(
            "Recorded {} alert {} from {}",
            alert.kind.as_str(),
            record_id,
            alert.actor_name
        );

        Ok(self.spawn_fanout(record_id, Event::Panic(alert)))
    }

    /// Record a patrol check-in and route it per its category.
    pub async fn notify_patrol(
        &self,
        check_in: PatrolCheckIn,
    ) -> Result<FanoutReceipt, BroadcastError> {
        let record_id = Uuid::new_v4().to_string();
        storage::patrol::insert_patrol_log(
            self.storage.pool(),
            &record_id,
            &check_in.operator_id,
            &check_in.operator_name,
            ids::usable_id(check_in.neighborhood_id.as_deref()),
            &check_in.note,
            ids::usable_id(check_in.target_resident_id.as_deref()),
        )
        .await?;
        info!(
            "Recorded patrol check-in {} ({:?})",
            record_id,
            check_in.category()
        );

        Ok(self.spawn_fanout(record_id, Event::Patrol(check_in)))
    }

    /// Record a pending signup and ask the admins to approve it.
    pub async fn notify_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<FanoutReceipt, BroadcastError> {
        storage::profile::create_profile(
            self.storage.pool(),
            &request.pending_user_id,
            &request.pending_user_name,
            None,
            request.role.as_str(),
            None,
            false,
        )
        .await?;
        info!("Recorded pending registration for {}", request.pending_user_name);

        let record_id = request.pending_user_id.clone();
        Ok(self.spawn_fanout(record_id, Event::Registration(request)))
    }

    /// Record a VIP service request and notify the neighborhood's patrol
    /// operators.
    pub async fn notify_service_request(
        &self,
        request: ServiceRequest,
    ) -> Result<FanoutReceipt, BroadcastError> {
        let record_id = Uuid::new_v4().to_string();
        storage::service_request::insert_service_request(
            self.storage.pool(),
            &record_id,
            &request.resident_id,
            &request.resident_name,
            &request.neighborhood_id,
            request.kind.as_str(),
        )
        .await?;
        info!(
            "Recorded service request {} ({})",
            record_id,
            request.kind.as_str()
        );

        Ok(self.spawn_fanout(record_id, Event::Service(request)))
    }

    /// Record a login notice and message the account's own phone.
    pub async fn notify_login(&self, notice: LoginNotice) -> Result<FanoutReceipt, BroadcastError> {
        let record_id = Uuid::new_v4().to_string();
        storage::notification::record_notification(
            self.storage.pool(),
            &record_id,
            "login_notice",
            None,
        )
        .await?;

        Ok(self.spawn_fanout(record_id, Event::Login(notice)))
    }

    /// Send an announcement to the requested audience. Awaited by the
    /// caller; returns how many numbers were targeted.
    pub async fn send_broadcast(
        &self,
        text: &str,
        scope: BroadcastScope,
        neighborhood_id: Option<&str>,
    ) -> Result<BroadcastReceipt, BroadcastError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BroadcastError::Validation(
                "broadcast text is empty".to_string(),
            ));
        }

        let record_id = Uuid::new_v4().to_string();
        storage::notification::record_notification(
            self.storage.pool(),
            &record_id,
            "admin_broadcast",
            Some(text),
        )
        .await?;

        let event = Event::Broadcast(AdminBroadcast {
            text: text.to_string(),
            scope,
            neighborhood_id: neighborhood_id.map(str::to_string),
        });

        let recipients = self.resolve(&event).await;
        let body = self.render(&event).await;
        let report = self.dispatcher.dispatch(&body, recipients).await?;

        if let Err(err) = storage::notification::mark_dispatched(
            self.storage.pool(),
            &record_id,
            &body,
            report.target_count as i64,
        )
        .await
        {
            warn!("Failed to update ledger row {}: {}", record_id, err);
        }

        info!(
            "Admin broadcast {} targeted {} numbers",
            record_id, report.target_count
        );
        Ok(BroadcastReceipt {
            record_id,
            sent_count: report.target_count,
        })
    }

    /// Send the channel-check message to one number. Awaited by the
    /// caller; gateway errors propagate.
    pub async fn send_test_message(&self, number: &str) -> Result<String, BroadcastError> {
        let Some(canonical) = phone::normalize(Some(number)) else {
            return Err(BroadcastError::Validation(format!(
                "unusable phone number: {}",
                number
            )));
        };

        self.dispatcher
            .send_direct(&canonical, &self.formatter.test_body())
            .await
    }

    fn spawn_fanout(&self, record_id: String, event: Event) -> FanoutReceipt {
        let pipeline = self.clone();
        let task_record_id = record_id.clone();
        let handle =
            tokio::spawn(async move { pipeline.run_fanout(task_record_id, event).await });

        FanoutReceipt {
            record_id,
            fanout: FanoutTask { handle },
        }
    }

    async fn run_fanout(self, record_id: String, event: Event) -> FanoutSummary {
        let recipients = self.resolve(&event).await;
        let body = self.render(&event).await;

        let report = match self.dispatcher.dispatch(&body, recipients).await {
            Ok(report) => report,
            Err(err) => {
                error!("Dispatch for {} failed: {}", record_id, err);
                return FanoutSummary::default();
            }
        };

        self.mirror_to_chat(&event, &body).await;
        self.update_ledger(&record_id, &event, &body, &report).await;

        let summary = FanoutSummary::from_report(&report);
        info!(
            "Fan-out for {} finished: {}/{} delivered",
            record_id, summary.delivered, summary.target_count
        );
        summary
    }

    /// Render the event body, degrading to the generic fallback. A
    /// persisted event is never dropped over a template problem.
    async fn render(&self, event: &Event) -> String {
        match self.formatter.format(event).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Formatting failed ({}); using fallback body", err);
                self.formatter.fallback_body()
            }
        }
    }

    /// Recipient scope per event kind. `None` means resolution was never
    /// attempted and the dispatcher falls back to the default destination.
    async fn resolve(&self, event: &Event) -> Option<RecipientSet> {
        match event {
            Event::Panic(alert) => match ids::usable_id(alert.neighborhood_id.as_deref()) {
                Some(hood) => Some(
                    self.resolver
                        .by_neighborhood(hood, Some(&alert.actor_id))
                        .await,
                ),
                None => None,
            },
            Event::Patrol(check_in) => match check_in.category() {
                PatrolCategory::Critical => {
                    match ids::usable_id(check_in.neighborhood_id.as_deref()) {
                        Some(hood) => Some(
                            self.resolver
                                .by_neighborhood(hood, Some(&check_in.operator_id))
                                .await,
                        ),
                        None => None,
                    }
                }
                PatrolCategory::Maintenance => Some(
                    self.resolver
                        .by_role(Role::Admin, check_in.neighborhood_id.as_deref())
                        .await,
                ),
                PatrolCategory::Targeted => {
                    match ids::usable_id(check_in.target_resident_id.as_deref()) {
                        Some(target) => Some(self.resolver.by_explicit_user(target).await),
                        None => None,
                    }
                }
                PatrolCategory::Routine => None,
            },
            Event::Registration(_) => {
                let admins = self.resolver.by_role(Role::Admin, None).await;
                if admins.is_empty() {
                    // A signup with no reachable admin goes to the default
                    // destination instead of being cancelled.
                    None
                } else {
                    Some(admins)
                }
            }
            Event::Service(request) => Some(
                self.resolver
                    .by_role(Role::Scr, Some(&request.neighborhood_id))
                    .await,
            ),
            Event::Login(notice) => match phone::normalize(notice.phone.as_deref()) {
                Some(number) => {
                    let mut set = RecipientSet::new();
                    set.insert(number);
                    Some(set)
                }
                None => Some(self.resolver.by_explicit_user(&notice.user_id).await),
            },
            Event::Broadcast(broadcast) => match broadcast.scope {
                BroadcastScope::All => Some(self.resolver.all().await),
                BroadcastScope::AdminsOnly => {
                    Some(self.resolver.by_role(Role::Admin, None).await)
                }
                BroadcastScope::Neighborhood => {
                    match ids::usable_id(broadcast.neighborhood_id.as_deref()) {
                        Some(hood) => Some(self.resolver.by_neighborhood(hood, None).await),
                        None => Some(RecipientSet::new()),
                    }
                }
            },
        }
    }

    /// Mirror panic and danger alerts into the neighborhood chat feed.
    async fn mirror_to_chat(&self, event: &Event, body: &str) {
        let Event::Panic(alert) = event else {
            return;
        };
        if !matches!(alert.kind, PanicKind::Panic | PanicKind::Danger) {
            return;
        }
        let Some(hood) = ids::usable_id(alert.neighborhood_id.as_deref()) else {
            return;
        };

        let message_id = Uuid::new_v4().to_string();
        if let Err(err) = storage::chat::insert_message(
            self.storage.pool(),
            &message_id,
            Some(hood),
            None,
            "Sentinela",
            body,
            true,
        )
        .await
        {
            warn!("Failed to mirror alert into the chat feed: {}", err);
        }
    }

    async fn update_ledger(
        &self,
        record_id: &str,
        event: &Event,
        body: &str,
        report: &DispatchReport,
    ) {
        let result = match event {
            // The login flow's durable record is its ledger row; fill it in.
            Event::Login(_) => {
                storage::notification::mark_dispatched(
                    self.storage.pool(),
                    record_id,
                    body,
                    report.target_count as i64,
                )
                .await
            }
            _ => {
                let ledger_id = Uuid::new_v4().to_string();
                storage::notification::record_dispatched(
                    self.storage.pool(),
                    &ledger_id,
                    event.kind(),
                    body,
                    report.target_count as i64,
                )
                .await
            }
        };

        if let Err(err) = result {
            warn!("Failed to write ledger row for {}: {}", record_id, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NeighborhoodCache;
    use crate::formatter::AppLinks;
    use crate::gateway::RecordingGateway;
    use std::sync::Arc;

    const DEFAULT_DEST: &str = "5500000000000";

    async fn test_pipeline() -> (AlertPipeline, Storage, Arc<RecordingGateway>) {
        let storage = Storage::connect("sqlite::memory:").await.unwrap();
        storage.migrate().await.unwrap();

        let gateway = Arc::new(RecordingGateway::new());
        let cache = Arc::new(NeighborhoodCache::new(storage.clone()));
        let pipeline = AlertPipeline::new(
            storage.clone(),
            RecipientResolver::new(storage.clone()),
            MessageFormatter::new(cache, storage.clone(), AppLinks::default()),
            BroadcastDispatcher::new(gateway.clone(), DEFAULT_DEST),
        );
        (pipeline, storage, gateway)
    }

    #[tokio::test]
    async fn test_empty_broadcast_text_is_rejected() {
        let (pipeline, storage, gateway) = test_pipeline().await;

        let err = pipeline
            .send_broadcast("   ", BroadcastScope::All, None)
            .await
            .unwrap_err();

        assert!(matches!(err, BroadcastError::Validation(_)));
        assert_eq!(gateway.call_count().await, 0);

        // Nothing was recorded either.
        let rows = storage::notification::recent_notifications(storage.pool(), 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_test_message_rejects_unusable_numbers() {
        let (pipeline, _storage, gateway) = test_pipeline().await;

        let err = pipeline.send_test_message("123-45").await.unwrap_err();
        assert!(matches!(err, BroadcastError::Validation(_)));
        assert_eq!(gateway.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_test_message_normalizes_and_propagates_failures() {
        let (pipeline, _storage, gateway) = test_pipeline().await;

        pipeline.send_test_message("+55 48 99999-8888").await.unwrap();
        let calls = gateway.calls().await;
        assert_eq!(calls[0].0, "5548999998888");
        assert!(calls[0].1.contains("TESTE SENTINELA"));

        gateway.fail_number("5548999998888").await;
        let err = pipeline
            .send_test_message("+55 48 99999-8888")
            .await
            .unwrap_err();
        assert!(matches!(err, BroadcastError::Dispatch(_)));
    }
}
