//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use broadcast::phone;

/// Alert API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Message gateway base URL.
    pub gateway_url: String,
    /// Bearer token for the gateway.
    pub gateway_token: String,
    /// Canonical fallback number for events with no resolvable audience.
    pub default_destination: String,
    /// Login deep link rendered into message bodies.
    pub login_url: String,
    /// User-management deep link rendered into registration notices.
    pub admin_users_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SENTINELA_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:sentinela.db?mode=rwc` |
    /// | `GATEWAY_URL` | Message gateway base URL | `http://127.0.0.1:3000` |
    /// | `GATEWAY_TOKEN` | Gateway bearer token | (required) |
    /// | `DEFAULT_DESTINATION` | Fallback phone number | (required) |
    /// | `LOGIN_URL` | Login link in messages | `https://sentinela.app/login` |
    /// | `ADMIN_USERS_URL` | Approval link in messages | `https://sentinela.app/admin/usuarios` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SENTINELA_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:sentinela.db?mode=rwc".to_string());

        let gateway_url = env::var("GATEWAY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

        let gateway_token =
            env::var("GATEWAY_TOKEN").map_err(|_| ConfigError::MissingGatewayToken)?;

        let raw_destination =
            env::var("DEFAULT_DESTINATION").map_err(|_| ConfigError::MissingDefaultDestination)?;
        let default_destination = phone::normalize(Some(&raw_destination))
            .ok_or(ConfigError::InvalidDefaultDestination)?;

        let login_url = env::var("LOGIN_URL")
            .unwrap_or_else(|_| "https://sentinela.app/login".to_string());

        let admin_users_url = env::var("ADMIN_USERS_URL")
            .unwrap_or_else(|_| "https://sentinela.app/admin/usuarios".to_string());

        Ok(Self {
            addr,
            database_url,
            gateway_url,
            gateway_token,
            default_destination,
            login_url,
            admin_users_url,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SENTINELA_ADDR format")]
    InvalidAddr,

    #[error("GATEWAY_TOKEN environment variable is required")]
    MissingGatewayToken,

    #[error("DEFAULT_DESTINATION environment variable is required")]
    MissingDefaultDestination,

    #[error("DEFAULT_DESTINATION is not a usable phone number")]
    InvalidDefaultDestination,
}
