//! Startup wiring: pick the store and resolve the listen address.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dosemate_db::MemoryStore;

use crate::config::{ConfigError, ServerConfig};
use crate::state::AppState;

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HOST '{0}' is not an IP address")]
    Host(String),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect and migrate Postgres when `DATABASE_URL` is set, otherwise fall
/// back to a fresh in-memory store.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on restart");
        return Ok(AppState::in_memory(
            config.clone(),
            Arc::new(MemoryStore::new()),
        ));
    };

    let pool = dosemate_db::create_pool(database_url, config.database_max_connections).await?;
    dosemate_db::health_check(&pool).await?;
    dosemate_db::run_migrations(&pool).await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "Postgres store ready",
    );

    Ok(AppState::postgres(config.clone(), pool))
}

/// The socket address to listen on.
pub fn listen_addr(config: &ServerConfig) -> Result<SocketAddr, StartupError> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupError::Host(config.host.clone()))?;
    Ok(SocketAddr::new(ip, config.port))
}
