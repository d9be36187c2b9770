//! Neighborhood display-name cache.

use std::collections::HashMap;

use storage::{Storage, StorageError};
use tokio::sync::RwLock;
use tracing::warn;

/// Read-through cache of neighborhood display names.
///
/// Display-only: names appear in message bodies and nowhere else; routing
/// decisions never consult the cache. Write paths that touch the
/// neighborhoods collection must call [`invalidate`](Self::invalidate).
pub struct NeighborhoodCache {
    names: RwLock<HashMap<String, String>>,
    storage: Storage,
}

impl NeighborhoodCache {
    /// Create a cache backed by the given storage handle.
    pub fn new(storage: Storage) -> Self {
        Self {
            names: RwLock::new(HashMap::new()),
            storage,
        }
    }

    /// Get the display name for a neighborhood id, or `None` when the id
    /// is unknown or the lookup fails.
    pub async fn display_name(&self, neighborhood_id: &str) -> Option<String> {
        if let Some(name) = self.names.read().await.get(neighborhood_id) {
            return Some(name.clone());
        }

        match storage::neighborhood::get_neighborhood(self.storage.pool(), neighborhood_id).await {
            Ok(neighborhood) => {
                self.names
                    .write()
                    .await
                    .insert(neighborhood_id.to_string(), neighborhood.name.clone());
                Some(neighborhood.name)
            }
            Err(StorageError::NotFound { .. }) => None,
            Err(err) => {
                warn!("Failed to load neighborhood {}: {}", neighborhood_id, err);
                None
            }
        }
    }

    /// Drop every cached name. Called on any write to the neighborhoods
    /// collection.
    pub async fn invalidate(&self) {
        self.names.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> Storage {
        let storage = Storage::connect("sqlite::memory:").await.unwrap();
        storage.migrate().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_read_through() {
        let storage = test_storage().await;
        storage::neighborhood::create_neighborhood(storage.pool(), "hood-centro-01", "Centro")
            .await
            .unwrap();

        let cache = NeighborhoodCache::new(storage);
        assert_eq!(cache.display_name("hood-centro-01").await.as_deref(), Some("Centro"));
        // Second read is served from the map.
        assert_eq!(cache.display_name("hood-centro-01").await.as_deref(), Some("Centro"));
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let cache = NeighborhoodCache::new(test_storage().await);
        assert_eq!(cache.display_name("hood-nowhere-9").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_picks_up_renames() {
        let storage = test_storage().await;
        storage::neighborhood::create_neighborhood(storage.pool(), "hood-centro-01", "Centro")
            .await
            .unwrap();

        let cache = NeighborhoodCache::new(storage.clone());
        assert_eq!(cache.display_name("hood-centro-01").await.as_deref(), Some("Centro"));

        storage::neighborhood::rename_neighborhood(storage.pool(), "hood-centro-01", "Centro Histórico")
            .await
            .unwrap();

        // Stale until invalidated.
        assert_eq!(cache.display_name("hood-centro-01").await.as_deref(), Some("Centro"));
        cache.invalidate().await;
        assert_eq!(
            cache.display_name("hood-centro-01").await.as_deref(),
            Some("Centro Histórico")
        );
    }
}
