//! Error types for gateway-client.

use thiserror::Error;

/// Errors that can occur when talking to the message gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("gateway rejected request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
