//! cartoes-api server binary
//!
//! Reads configuration (see [`cartoes::config`]), builds the configured
//! storage backend and serves the REST API until Ctrl+C or SIGTERM.

use anyhow::Result;
use cartoes::config::{AppConfig, StorageBackend, StorageConfig};
use cartoes::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        backend = ?config.storage.backend,
        address = %config.server.address(),
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let builder = ServerBuilder::new().with_api_config(config.api.clone());
    let builder = match config.storage.backend {
        StorageBackend::InMemory => builder.with_in_memory_stores(),
        StorageBackend::Postgres => with_postgres(builder, &config.storage).await?,
    };

    builder.serve(&config.server.address()).await
}

#[cfg(feature = "postgres")]
async fn with_postgres(builder: ServerBuilder, storage: &StorageConfig) -> Result<ServerBuilder> {
    use anyhow::Context;
    use cartoes::storage::postgres::{connect, ensure_schema};
    use cartoes::storage::{PostgresCardStore, PostgresCustomerStore};

    let url = storage
        .database_url
        .as_deref()
        .context("storage.database_url is required for the postgres backend")?;

    let pool = connect(url, storage.max_connections).await?;
    ensure_schema(&pool).await?;
    tracing::info!("PostgreSQL schema ready");

    Ok(builder
        .with_customer_store(PostgresCustomerStore::new(pool.clone()))
        .with_card_store(PostgresCardStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn with_postgres(_builder: ServerBuilder, _storage: &StorageConfig) -> Result<ServerBuilder> {
    anyhow::bail!("the postgres backend requires building with `--features postgres`")
}
