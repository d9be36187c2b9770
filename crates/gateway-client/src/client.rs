//! Message gateway HTTP client.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::TargetOutcome;

/// JSON payload accepted by the gateway's send endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    number: &'a str,
    body: &'a str,
    token: &'a str,
}

/// Client for the text-message gateway.
///
/// Stateless beyond its configuration: one endpoint, one static token. The
/// gateway is treated as best-effort; batch sends capture per-number failures
/// instead of propagating them.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Build a client from the given configuration.
    ///
    /// Fails only when the underlying HTTP client cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { http, config })
    }

    /// Send one message to one number, returning the gateway's textual
    /// acknowledgement.
    pub async fn send_text(&self, number: &str, body: &str) -> Result<String, GatewayError> {
        let request = SendRequest {
            number,
            body,
            token: &self.config.token,
        };

        debug!(number = %number, "Sending message through gateway");

        let response = self
            .http
            .post(self.config.send_url())
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(GatewayError::Http)
    }

    /// Send the same body to every number, all requests in flight
    /// concurrently.
    ///
    /// Each delivery is caught independently; a failed number yields a
    /// failed [`TargetOutcome`] and the batch still completes.
    pub async fn send_batch(&self, body: &str, numbers: &[String]) -> Vec<TargetOutcome> {
        let sends = numbers.iter().map(|number| async move {
            match self.send_text(number, body).await {
                Ok(ack) => TargetOutcome::delivered(number.clone(), ack),
                Err(e) => {
                    warn!(number = %number, error = %e, "Gateway delivery failed");
                    TargetOutcome::failed(number.clone(), e.to_string())
                }
            }
        });

        futures::future::join_all(sends).await
    }

    /// Probe the gateway's status endpoint.
    pub async fn health_check(&self) -> Result<bool, GatewayError> {
        let url = self.config.status_url();
        debug!(url = %url, "Gateway health check");

        let response = self.http.get(&url).send().await.map_err(GatewayError::Http)?;
        Ok(response.status().is_success())
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .finish()
    }
}
