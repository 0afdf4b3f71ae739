//! CLI command implementations.

pub mod catalog;
pub mod migrate;

use thiserror::Error;

use cake_maker_api::config::ConfigError;
use cake_maker_api::services::CatalogError;

/// Errors any command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Connect to the database named by the API configuration.
async fn connect() -> Result<sqlx::PgPool, CommandError> {
    let config = cake_maker_api::config::ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(cake_maker_api::db::create_pool(&config.database_url).await?)
}
