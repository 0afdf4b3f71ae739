//! Layer catalog: read-only reference data, reloaded wholesale from the
//! embedded seed on request.

use thiserror::Error;

use crate::db::{RepositoryError, Store};
use crate::models::{Layer, NewLayer};

/// Seed data shipped with the binary.
const SEED: &str = include_str!("../../data/layers.json");

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The embedded seed could not be parsed.
    #[error("invalid catalog seed: {0}")]
    Seed(#[from] serde_json::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Parse the embedded seed set.
///
/// # Errors
///
/// Returns `CatalogError::Seed` if the seed is not valid JSON.
pub fn seed() -> Result<Vec<NewLayer>, CatalogError> {
    Ok(serde_json::from_str(SEED)?)
}

/// Catalog service.
pub struct Catalog<'a> {
    store: &'a dyn Store,
}

impl<'a> Catalog<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Replace the stored catalog with the seed set.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the seed is invalid or the store fails.
    pub async fn reload(&self) -> Result<Vec<Layer>, CatalogError> {
        let layers = self.store.replace_layers(&seed()?).await?;
        tracing::info!(layers = layers.len(), "Catalog reloaded");
        Ok(layers)
    }

    /// All layers in seed order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Layer>, CatalogError> {
        Ok(self.store.list_layers().await?)
    }
}
