//! In-process store used by tests and local experiments.
//!
//! Mirrors the observable behavior of [`PgStore`](super::PgStore): unique
//! emails, newest-first listings, idempotent order linking.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use cake_maker_core::{Email, LayerId, OrderId, UserId};

use super::{CatalogStore, OrderStore, RepositoryError, Store, UserStore};
use crate::models::{Layer, NewLayer, NewOrder, NewUser, Order, User};

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order; newest last.
    users: Vec<User>,
    /// Insertion order; newest last.
    orders: Vec<Order>,
    layers: Vec<Layer>,
}

/// A [`Store`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let record = User {
            id: UserId::generate(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            access_token: user.access_token,
            ordered_cakes: Vec::new(),
            created_at: Utc::now(),
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn list_users(&self, limit: usize) -> Result<Vec<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().rev().take(limit).cloned().collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let presented = token.as_bytes();

        // Compare against every stored token so timing does not depend on
        // where (or whether) the match is.
        let mut found = None;
        for user in &tables.users {
            let stored = user.access_token.as_str().as_bytes();
            if bool::from(stored.ct_eq(presented)) {
                found = Some(user.clone());
            }
        }
        Ok(found)
    }

    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn append_order(&self, user: UserId, order: OrderId) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let record = tables
            .users
            .iter_mut()
            .find(|u| u.id == user)
            .ok_or(RepositoryError::NotFound)?;

        if !record.ordered_cakes.contains(&order) {
            record.ordered_cakes.push(order);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        self.check_available()?;
        let record = Order {
            id: OrderId::generate(),
            details: order.details,
            created_at: Utc::now(),
            ordered_by: order.ordered_by,
        };
        self.tables.write().await.orders.push(record.clone());
        Ok(record)
    }

    async fn list_orders(&self, limit: usize) -> Result<Vec<Order>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().rev().take(limit).cloned().collect())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn get_orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.orders.iter().find(|o| o.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn replace_layers(&self, layers: &[NewLayer]) -> Result<Vec<Layer>, RepositoryError> {
        self.check_available()?;
        let fresh: Vec<Layer> = layers
            .iter()
            .map(|layer| Layer {
                id: LayerId::generate(),
                name: layer.name.clone(),
                ingredients: layer.ingredients.clone(),
            })
            .collect();
        self.tables.write().await.layers.clone_from(&fresh);
        Ok(fresh)
    }

    async fn list_layers(&self) -> Result<Vec<Layer>, RepositoryError> {
        self.check_available()?;
        Ok(self.tables.read().await.layers.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}
