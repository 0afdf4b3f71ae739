//! Persistence for users, cake orders, and the layer catalog.
//!
//! Services talk to storage only through the traits in this module, so the
//! same directory/ledger/catalog code runs against `PostgreSQL` in production
//! and against [`MemoryStore`] in tests.
//!
//! # Database
//!
//! Postgres is used document-style: order details and layer ingredients are
//! `JSONB` documents, a user's placed orders are a `UUID[]`.
//!
//! ## Tables
//!
//! - `cake_user` - Users, password digests, and access tokens
//! - `cake_order` - Placed cake orders
//! - `layer` - Catalog of layers and ingredients
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p cake-maker-cli -- migrate
//! ```

pub mod layers;
pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cake_maker_core::{Email, OrderId, UserId};

use crate::models::{Layer, NewLayer, NewOrder, NewUser, Order, User};

pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Up to `limit` users, newest first.
    async fn list_users(&self, limit: usize) -> Result<Vec<User>, RepositoryError>;

    /// A user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// A user by normalized email.
    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// The user whose access token is exactly `token`.
    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;

    /// All users among `ids` that exist, in no particular order.
    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError>;

    /// Append `order` to the user's placed orders unless already present.
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn append_order(&self, user: UserId, order: OrderId) -> Result<(), RepositoryError>;
}

/// Storage for cake orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Up to `limit` orders, newest first.
    async fn list_orders(&self, limit: usize) -> Result<Vec<Order>, RepositoryError>;

    /// An order by ID.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// The orders among `ids` that exist, in the order of `ids`.
    async fn get_orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError>;
}

/// Storage for the layer catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Atomically replace the whole catalog with `layers`, keeping their order.
    async fn replace_layers(&self, layers: &[NewLayer]) -> Result<Vec<Layer>, RepositoryError>;

    /// All layers in catalog order.
    async fn list_layers(&self) -> Result<Vec<Layer>, RepositoryError>;
}

/// A complete backing store for the application.
#[async_trait]
pub trait Store: UserStore + OrderStore + CatalogStore {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Convert a list limit to the `BIGINT` Postgres expects.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
