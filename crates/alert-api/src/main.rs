//! HTTP surface for the Sentinela alert engine.
//!
//! Exposes the event trigger routes (panic, patrol, registration, service
//! request, login), the admin surface (broadcast, approvals, neighborhoods)
//! and the read feeds consumed by the mobile clients.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use broadcast::{
    AlertPipeline, AppLinks, BroadcastDispatcher, MessageFormatter, NeighborhoodCache,
    RecipientResolver,
};
use gateway_client::{GatewayClient, GatewayConfig};
use storage::Storage;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting alert API server");

    // Connect to database
    let storage = Storage::connect(&config.database_url).await?;
    storage.migrate().await?;

    // Connect to the message gateway
    let gateway = Arc::new(GatewayClient::new(GatewayConfig::new(
        &config.gateway_url,
        &config.gateway_token,
    ))?);

    // Wire the fan-out pipeline
    let cache = Arc::new(NeighborhoodCache::new(storage.clone()));
    let links = AppLinks {
        login_url: config.login_url.clone(),
        admin_users_url: config.admin_users_url.clone(),
    };
    let pipeline = AlertPipeline::new(
        storage.clone(),
        RecipientResolver::new(storage.clone()),
        MessageFormatter::new(cache.clone(), storage.clone(), links),
        BroadcastDispatcher::new(gateway.clone(), config.default_destination.clone()),
    );

    // Build application state
    let state = AppState::new(pipeline, storage, cache, gateway);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Alert API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
