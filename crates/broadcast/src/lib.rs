//! Alert fan-out engine for the Sentinela neighborhood-security platform.
//!
//! This crate provides the [`AlertPipeline`] type which turns typed events
//! (panic button, patrol check-in, registration, service request, login,
//! admin broadcast) into delivered notifications.
//!
//! # Features
//!
//! - Resolves recipients per event scope (neighborhood, role, single user,
//!   system-wide) with normalization and de-duplication
//! - Renders fixed Portuguese message templates per event kind
//! - Cancels sends for explicitly empty scopes, falls back to a default
//!   destination for unresolved ones
//! - Persists every event before any notification work starts
//! - Mirrors panic alerts into the neighborhood chat feed
//!
//! # Architecture
//!
//! ```text
//! Typed event (from HTTP route or scheduler)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ALERT PIPELINE                         │
//! │                                                             │
//! │  1. Persist durable record (synchronous; failure is fatal)  │
//! │         ↓                 ── caller gets its receipt here ──│
//! │  2. Resolve recipients (RecipientResolver, best-effort)     │
//! │         ↓                                                   │
//! │  3. Format body (MessageFormatter, fallback on error)       │
//! │         ↓                                                   │
//! │  4. Dispatch (BroadcastDispatcher → MessageGateway)         │
//! │     • empty set   → cancelled, zero calls                   │
//! │     • no set      → one call to the default destination     │
//! │     • otherwise   → one concurrent call per number          │
//! │         ↓                                                   │
//! │  5. Side effects: chat mirror, notification ledger          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use broadcast::{
//!     AlertPipeline, AppLinks, BroadcastDispatcher, MessageFormatter,
//!     NeighborhoodCache, PanicAlert, PanicKind, RecipientResolver, Role,
//! };
//! use gateway_client::{GatewayClient, GatewayConfig};
//! use storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Storage::connect("sqlite:sentinela.db?mode=rwc").await?;
//!     storage.migrate().await?;
//!
//!     let gateway = Arc::new(GatewayClient::new(GatewayConfig::new(
//!         "https://gateway.example.com",
//!         "secret-token",
//!     ))?);
//!     let cache = Arc::new(NeighborhoodCache::new(storage.clone()));
//!
//!     let pipeline = AlertPipeline::new(
//!         storage.clone(),
//!         RecipientResolver::new(storage.clone()),
//!         MessageFormatter::new(cache, storage.clone(), AppLinks::default()),
//!         BroadcastDispatcher::new(gateway, "5500000000000"),
//!     );
//!
//!     let receipt = pipeline
//!         .notify_panic(PanicAlert {
//!             kind: PanicKind::Panic,
//!             actor_id: "user-0001".into(),
//!             actor_name: "Laura".into(),
//!             actor_role: Role::Resident,
//!             neighborhood_id: Some("hood-centro-01".into()),
//!             note: Some("Alguém no pátio!".into()),
//!         })
//!         .await?;
//!
//!     receipt.fanout.detach();
//!     Ok(())
//! }
//! ```

mod cache;
mod dispatcher;
mod error;
mod event;
mod formatter;
mod gateway;
pub mod ids;
pub mod phone;
mod pipeline;
mod resolver;

// Public exports
pub use cache::NeighborhoodCache;
pub use dispatcher::{BroadcastDispatcher, DispatchReport};
pub use error::BroadcastError;
pub use event::{
    AdminBroadcast, BroadcastScope, Event, LoginNotice, PanicAlert, PanicKind, PatrolCategory,
    PatrolCheckIn, RegistrationRequest, Role, ServiceKind, ServiceRequest,
};
pub use formatter::{AppLinks, MessageFormatter};
pub use gateway::{MessageGateway, NoOpGateway, RecordingGateway};
pub use pipeline::{
    AlertPipeline, BroadcastReceipt, FanoutReceipt, FanoutSummary, FanoutTask,
};
pub use resolver::{RecipientResolver, RecipientSet};

// Re-export the per-target outcome the dispatch report is built from
pub use gateway_client::TargetOutcome;
