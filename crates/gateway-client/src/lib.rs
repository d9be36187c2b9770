//! Text-message gateway client library.
//!
//! This crate provides a Rust client for the external messaging gateway used
//! by the Sentinela alert engine. The gateway exposes a single HTTP endpoint
//! accepting `{number, body, token}` and answering with a textual
//! acknowledgement; there is no delivery guarantee beyond that
//! acknowledgement.
//!
//! # Example
//!
//! ```no_run
//! use gateway_client::{GatewayClient, GatewayConfig};
//!
//! # async fn example() -> Result<(), gateway_client::GatewayError> {
//! let config = GatewayConfig::new("http://localhost:3001", "secret-token");
//! let client = GatewayClient::new(config)?;
//!
//! // Single send
//! let ack = client.send_text("5548999998888", "Olá!").await?;
//! println!("Gateway said: {}", ack);
//!
//! // Batch send: per-number outcomes, no all-or-nothing failure
//! let numbers = vec!["5548999998888".to_string(), "5548988887777".to_string()];
//! for outcome in client.send_batch("Aviso geral", &numbers).await {
//!     println!("{}: success={}", outcome.number, outcome.success);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::GatewayClient;
pub use config::{GatewayConfig, DEFAULT_TIMEOUT};
pub use error::GatewayError;
pub use types::TargetOutcome;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
