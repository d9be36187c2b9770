//! Gateway transport trait and test doubles.

use std::collections::HashSet;

use async_trait::async_trait;
use gateway_client::{GatewayClient, TargetOutcome};
use tokio::sync::Mutex;

use crate::error::BroadcastError;

/// Trait for delivering message bodies to phone numbers.
///
/// Abstracted over the HTTP gateway so the dispatcher and pipeline can be
/// exercised without a live endpoint.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver one message and return the gateway's acknowledgement text.
    async fn send_text(&self, number: &str, body: &str) -> Result<String, BroadcastError>;

    /// Deliver one body to many numbers, all requests in flight at once.
    ///
    /// Each send is caught independently; a failed number becomes a failed
    /// [`TargetOutcome`], never an error for the batch.
    async fn send_batch(&self, body: &str, numbers: &[String]) -> Vec<TargetOutcome> {
        let sends = numbers.iter().map(|number| async move {
            match self.send_text(number, body).await {
                Ok(response) => TargetOutcome::delivered(number.clone(), response),
                Err(err) => {
                    tracing::warn!("Delivery to {} failed: {}", number, err);
                    TargetOutcome::failed(number.clone(), err.to_string())
                }
            }
        });

        futures::future::join_all(sends).await
    }
}

#[async_trait]
impl MessageGateway for GatewayClient {
    async fn send_text(&self, number: &str, body: &str) -> Result<String, BroadcastError> {
        GatewayClient::send_text(self, number, body)
            .await
            .map_err(|e| BroadcastError::Dispatch(e.to_string()))
    }

    async fn send_batch(&self, body: &str, numbers: &[String]) -> Vec<TargetOutcome> {
        GatewayClient::send_batch(self, body, numbers).await
    }
}

/// A no-op gateway that accepts and discards every message.
#[derive(Debug, Clone, Default)]
pub struct NoOpGateway;

#[async_trait]
impl MessageGateway for NoOpGateway {
    async fn send_text(&self, _number: &str, _body: &str) -> Result<String, BroadcastError> {
        Ok(String::new())
    }
}

/// A gateway that records every send, with optional per-number failure
/// injection. Used by the dispatcher and pipeline tests.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(String, String)>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `number` fail from now on.
    pub async fn fail_number(&self, number: &str) {
        self.failing.lock().await.insert(number.to_string());
    }

    /// Snapshot of every `(number, body)` attempted, in call order.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }

    /// Total number of send attempts so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Numbers attempted so far, in call order.
    pub async fn numbers(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|(number, _)| number.clone())
            .collect()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_text(&self, number: &str, body: &str) -> Result<String, BroadcastError> {
        self.calls
            .lock()
            .await
            .push((number.to_string(), body.to_string()));

        if self.failing.lock().await.contains(number) {
            return Err(BroadcastError::Dispatch(format!(
                "simulated gateway failure for {}",
                number
            )));
        }

        Ok("ok".to_string())
    }
}
