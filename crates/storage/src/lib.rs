//! SQLite persistence layer for the Sentinela alert engine.
//!
//! This crate provides async row-level operations for the collections the
//! broadcast engine reads and writes: profiles, neighborhoods, alerts, the
//! community chat feed, the outbound notification ledger, service requests
//! and patrol logs. No transactions; each write is independent.
//!
//! # Example
//!
//! ```no_run
//! use storage::{profile, Storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let storage = Storage::connect("sqlite:sentinela.db?mode=rwc").await?;
//!     storage.migrate().await?;
//!
//!     // Register a pending profile
//!     profile::create_profile(
//!         storage.pool(),
//!         "8f4f1d2a-77aa-4f24-9b5c-02c1d1a0f3e7",
//!         "Laura",
//!         Some("+55 48 99999-8888"),
//!         "resident",
//!         Some("hood-centro"),
//!         false,
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod chat;
pub mod error;
pub mod models;
pub mod neighborhood;
pub mod notification;
pub mod patrol;
pub mod profile;
pub mod service_request;

pub use error::{Result, StorageError};
pub use models::{
    Alert, ChatMessage, Neighborhood, NotificationRecord, PatrolLog, Profile, ServiceRequest,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Storage connection wrapper.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Default pool size. High enough that concurrent fan-out tasks never
    /// queue behind each other on the pool.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to storage: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// Call once after connecting to bring the schema up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running storage migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
