//! Configuration types for gateway-client.

use std::fmt;
use std::time::Duration;

/// Default per-request timeout. A hung gateway must not hold a fan-out open.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the text-message gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway HTTP server (e.g., "http://localhost:3001").
    pub base_url: String,
    /// Static bearer token sent with every request.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a new configuration with the given base URL and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/send", self.base_url)
    }

    /// Get the status endpoint URL used for reachability probes.
    pub fn status_url(&self) -> String {
        format!("{}/status", self.base_url)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
