//! Application state shared across handlers.

use std::sync::Arc;

use broadcast::{AlertPipeline, NeighborhoodCache};
use gateway_client::GatewayClient;
use storage::Storage;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Alert fan-out pipeline.
    pub pipeline: AlertPipeline,
    /// Database handle for read and admin routes.
    pub storage: Storage,
    /// Neighborhood name cache; cleared on neighborhood writes.
    pub cache: Arc<NeighborhoodCache>,
    /// Gateway handle for the health probe.
    pub gateway: Arc<GatewayClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        pipeline: AlertPipeline,
        storage: Storage,
        cache: Arc<NeighborhoodCache>,
        gateway: Arc<GatewayClient>,
    ) -> Self {
        Self {
            pipeline,
            storage,
            cache,
            gateway,
        }
    }
}
