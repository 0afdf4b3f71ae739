//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::{RepositoryError, Store};
use crate::services::{Catalog, OrderLedger, UserDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands out the services,
/// all of which borrow the one shared store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: Arc<dyn Store>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `store` - Backing store (`PgStore` in production)
    #[must_use]
    pub fn new<S: Store + 'static>(config: ApiConfig, store: Arc<S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// The user directory.
    #[must_use]
    pub fn users(&self) -> UserDirectory<'_> {
        UserDirectory::new(self.store())
    }

    /// The order ledger, accepting the configured order schema.
    #[must_use]
    pub fn orders(&self) -> OrderLedger<'_> {
        OrderLedger::new(self.store(), self.inner.config.order_schema)
    }

    /// The layer catalog.
    #[must_use]
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self.store())
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.store().ping().await
    }
}
