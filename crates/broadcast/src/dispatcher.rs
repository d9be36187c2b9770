//! Dispatch rules: who gets the message, if anyone.

use std::sync::Arc;

use gateway_client::TargetOutcome;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BroadcastError;
use crate::gateway::MessageGateway;
use crate::resolver::RecipientSet;

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Numbers the dispatch targeted; 0 when it was cancelled.
    pub target_count: usize,
    /// Per-number outcome, one entry per target.
    pub outcomes: Vec<TargetOutcome>,
}

impl DispatchReport {
    /// Count of targets whose send was acknowledged.
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    fn cancelled() -> Self {
        Self {
            target_count: 0,
            outcomes: Vec::new(),
        }
    }
}

/// Applies the recipient-set rules and hands bodies to the gateway.
#[derive(Clone)]
pub struct BroadcastDispatcher {
    gateway: Arc<dyn MessageGateway>,
    default_destination: String,
}

impl BroadcastDispatcher {
    /// Create a dispatcher over a gateway and a fixed fallback target.
    pub fn new(gateway: Arc<dyn MessageGateway>, default_destination: impl Into<String>) -> Self {
        Self {
            gateway,
            default_destination: default_destination.into(),
        }
    }

    /// The destination used when no scope was resolved at all.
    pub fn default_destination(&self) -> &str {
        &self.default_destination
    }

    /// Deliver a body per the recipient rules.
    ///
    /// `Some` with an empty set cancels the send: the scope was resolved
    /// and nobody is in it. `None` means resolution was never attempted,
    /// and the body goes to the default destination instead. Individual
    /// delivery failures are recorded in the report, never raised; the
    /// only error is a body that cannot be sent at all.
    pub async fn dispatch(
        &self,
        body: &str,
        recipients: Option<RecipientSet>,
    ) -> Result<DispatchReport, BroadcastError> {
        if body.trim().is_empty() {
            return Err(BroadcastError::Dispatch("message body is empty".to_string()));
        }

        match recipients {
            Some(set) if set.is_empty() => {
                warn!("Dispatch cancelled: scope resolved to zero recipients");
                Ok(DispatchReport::cancelled())
            }
            Some(set) => {
                let outcomes = self.gateway.send_batch(body, set.numbers()).await;
                let report = DispatchReport {
                    target_count: set.len(),
                    outcomes,
                };
                info!(
                    "Dispatched to {} targets, {} delivered",
                    report.target_count,
                    report.delivered()
                );
                Ok(report)
            }
            None => {
                info!(
                    "No scope resolved; sending to default destination {}",
                    self.default_destination
                );
                let outcome = match self.gateway.send_text(&self.default_destination, body).await {
                    Ok(response) => {
                        TargetOutcome::delivered(self.default_destination.clone(), response)
                    }
                    Err(err) => {
                        warn!("Fallback delivery failed: {}", err);
                        TargetOutcome::failed(self.default_destination.clone(), err.to_string())
                    }
                };
                Ok(DispatchReport {
                    target_count: 1,
                    outcomes: vec![outcome],
                })
            }
        }
    }

    /// Send one message directly, bypassing the recipient rules.
    ///
    /// Unlike [`dispatch`](Self::dispatch) this propagates the gateway
    /// error; it backs the synchronous channel-check entry point.
    pub async fn send_direct(&self, number: &str, body: &str) -> Result<String, BroadcastError> {
        self.gateway.send_text(number, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RecordingGateway;

    const DEFAULT_DEST: &str = "5500000000000";

    fn dispatcher(gateway: Arc<RecordingGateway>) -> BroadcastDispatcher {
        BroadcastDispatcher::new(gateway, DEFAULT_DEST)
    }

    fn set_of(numbers: &[&str]) -> RecipientSet {
        let mut set = RecipientSet::new();
        for number in numbers {
            set.insert(number.to_string());
        }
        set
    }

    #[tokio::test]
    async fn test_empty_set_cancels_send() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone());

        let report = dispatcher
            .dispatch("corpo", Some(RecipientSet::new()))
            .await
            .unwrap();

        assert_eq!(report.target_count, 0);
        assert!(report.outcomes.is_empty());
        assert_eq!(gateway.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_null_set_falls_back_to_default() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone());

        let report = dispatcher.dispatch("corpo", None).await.unwrap();

        assert_eq!(report.target_count, 1);
        assert_eq!(report.delivered(), 1);

        let calls = gateway.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, DEFAULT_DEST);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_reported_not_raised() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.fail_number(DEFAULT_DEST).await;
        let dispatcher = dispatcher(gateway.clone());

        let report = dispatcher.dispatch("corpo", None).await.unwrap();

        assert_eq!(report.target_count, 1);
        assert_eq!(report.delivered(), 0);
        assert!(!report.outcomes[0].success);
    }

    #[tokio::test]
    async fn test_delivers_to_every_member() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone());

        let report = dispatcher
            .dispatch("corpo", Some(set_of(&["1111111111", "2222222222"])))
            .await
            .unwrap();

        assert_eq!(report.target_count, 2);
        assert_eq!(report.delivered(), 2);
        assert_eq!(gateway.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let gateway = Arc::new(RecordingGateway::new());
        gateway.fail_number("2222222222").await;
        let dispatcher = dispatcher(gateway.clone());

        let report = dispatcher
            .dispatch(
                "corpo",
                Some(set_of(&["1111111111", "2222222222", "3333333333"])),
            )
            .await
            .unwrap();

        assert_eq!(report.target_count, 3);
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].success);
        assert!(!report.outcomes[1].success);
        assert!(report.outcomes[2].success);
        assert_eq!(report.delivered(), 2);
    }

    #[tokio::test]
    async fn test_empty_body_is_an_error() {
        let gateway = Arc::new(RecordingGateway::new());
        let dispatcher = dispatcher(gateway.clone());

        let err = dispatcher
            .dispatch("   ", Some(set_of(&["1111111111"])))
            .await
            .unwrap_err();

        assert!(matches!(err, BroadcastError::Dispatch(_)));
        assert_eq!(gateway.call_count().await, 0);
    }
}
