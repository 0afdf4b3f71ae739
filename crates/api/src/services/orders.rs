//! Order ledger: validation, placement and lookup of cake orders.

use std::collections::HashMap;

use thiserror::Error;

use cake_maker_core::{OrderId, UserId};

use super::auth::AuthError;
use super::users::UserDirectory;
use crate::db::{RepositoryError, Store};
use crate::models::{
    CurrentUser, NewOrder, Order, OrderFields, OrderSchema, OrderView, UserSummary,
    ValidationErrors,
};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// One or more order fields were rejected.
    #[error("invalid order fields ({} field(s))", .0.len())]
    Validation(ValidationErrors),

    /// Order not found.
    #[error("order not found")]
    NotFound,

    /// The order was stored but could not be added to its owner's list.
    #[error("order {order_id} stored but not linked to its owner: {source}")]
    Unlinked {
        order_id: OrderId,
        #[source]
        source: AuthError,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order ledger service.
pub struct OrderLedger<'a> {
    store: &'a dyn Store,
    schema: OrderSchema,
}

impl<'a> OrderLedger<'a> {
    /// Create a ledger over `store` accepting orders shaped by `schema`.
    #[must_use]
    pub const fn new(store: &'a dyn Store, schema: OrderSchema) -> Self {
        Self { store, schema }
    }

    /// Validate and store an order for `owner`.
    ///
    /// Does not touch the owner's record; see [`Self::place_order`].
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` with every rejected field.
    pub async fn create_order(
        &self,
        owner: UserId,
        fields: &OrderFields,
    ) -> Result<Order, OrderError> {
        let details = fields.validate(self.schema).map_err(OrderError::Validation)?;
        let order = self
            .store
            .insert_order(NewOrder {
                ordered_by: owner,
                details,
            })
            .await?;
        Ok(order)
    }

    /// Create an order and append it to the owner's placed orders.
    ///
    /// The two writes are not atomic. If the second one fails the order
    /// stays stored and the failure is reported as `OrderError::Unlinked`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` with every rejected field.
    /// Returns `OrderError::Unlinked` if the owner's record could not be updated.
    pub async fn place_order(
        &self,
        owner: &CurrentUser,
        fields: &OrderFields,
    ) -> Result<OrderView, OrderError> {
        let order = self.create_order(owner.id, fields).await?;

        if let Err(source) = UserDirectory::new(self.store)
            .record_order(owner.id, order.id)
            .await
        {
            tracing::error!(
                order_id = %order.id,
                user_id = %owner.id,
                error = %source,
                "Order stored but not linked to its owner"
            );
            return Err(OrderError::Unlinked {
                order_id: order.id,
                source,
            });
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %owner.id,
            cake_name = order.details.cake_name(),
            "Cake order placed"
        );
        Ok(OrderView::new(order, Some(UserSummary::from(owner.clone()))))
    }

    /// Up to `limit` orders, newest first, with owners embedded where they
    /// still resolve.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_orders(&self, limit: usize) -> Result<Vec<OrderView>, OrderError> {
        let orders = self.store.list_orders(limit).await?;

        let mut owner_ids: Vec<UserId> = orders.iter().map(|o| o.ordered_by).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<UserId, UserSummary> = self
            .store
            .get_users(&owner_ids)
            .await?
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| {
                let owner = owners.get(&order.ordered_by).cloned();
                OrderView::new(order, owner)
            })
            .collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        self.store.get_order(id).await?.ok_or(OrderError::NotFound)
    }

    /// Get an order by ID with its owner embedded, in the same shape
    /// [`Self::place_order`] and [`Self::list_orders`] return.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn find_view(&self, id: OrderId) -> Result<OrderView, OrderError> {
        let order = self.find_by_id(id).await?;
        let owner = self.store.get_user(order.ordered_by).await?;
        Ok(OrderView::new(order, owner.as_ref().map(UserSummary::from)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, OrderStore};
    use crate::models::{CakeDetails, OwnerRef, SignupFields};

    fn emmas_cake() -> OrderFields {
        OrderFields {
            cake_name: Some("Emmas cool cake".to_string()),
            topping: Some("strawberries".to_string()),
            cover: Some("cream".to_string()),
            layer1: Some("custard".to_string()),
            layer2: Some("jam".to_string()),
            sponge: Some("vanilla".to_string()),
            ingredients: None,
        }
    }

    async fn emma(store: &MemoryStore) -> CurrentUser {
        let user = UserDirectory::new(store)
            .create_user(&SignupFields {
                name: Some("Emma".to_string()),
                email: Some("emma@emma.se".to_string()),
                password: Some("emma".to_string()),
            })
            .await
            .unwrap();
        CurrentUser::from(&user)
    }

    #[tokio::test]
    async fn test_place_order_links_owner() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);

        let view = ledger.place_order(&owner, &emmas_cake()).await.unwrap();
        assert!(matches!(&view.ordered_by, OwnerRef::Profile(p) if p.id == owner.id));

        let user = UserDirectory::new(&store).find_by_id(owner.id).await.unwrap();
        assert_eq!(user.ordered_cakes, vec![view.id]);
    }

    #[tokio::test]
    async fn test_created_order_reads_back_unchanged() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);

        let created = ledger.create_order(owner.id, &emmas_cake()).await.unwrap();
        let fetched = ledger.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.details.cake_name(), "Emmas cool cake");

        // create_order alone leaves the owner untouched
        let user = UserDirectory::new(&store).find_by_id(owner.id).await.unwrap();
        assert!(user.ordered_cakes.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_order_is_not_stored() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);

        let fields = OrderFields {
            cake_name: Some("Cake".to_string()),
            ..emmas_cake()
        };
        let err = ledger.place_order(&owner, &fields).await.unwrap_err();
        assert!(matches!(err, OrderError::Validation(e) if e.get("cakeName").is_some()));
        assert!(store.list_orders(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_when_owner_missing() {
        let store = MemoryStore::new();
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);
        let ghost = CurrentUser {
            id: UserId::generate(),
            name: "Ghost".to_string(),
            email: cake_maker_core::Email::parse("ghost@emma.se").unwrap(),
        };

        let err = ledger.place_order(&ghost, &emmas_cake()).await.unwrap_err();
        let OrderError::Unlinked { order_id, source } = err else {
            panic!("expected unlinked order");
        };
        assert!(matches!(source, AuthError::UserNotFound));
        // The order itself stays stored
        assert!(ledger.find_by_id(order_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_embeds_owners_newest_first() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);

        for name in ["First cake", "Second cake", "Third cake"] {
            let fields = OrderFields {
                cake_name: Some(name.to_string()),
                ..emmas_cake()
            };
            ledger.place_order(&owner, &fields).await.unwrap();
        }
        // An order whose owner no longer resolves keeps the bare id
        let stray = UserId::generate();
        ledger.create_order(stray, &emmas_cake()).await.unwrap();

        let views = ledger.list_orders(3).await.unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].ordered_by, OwnerRef::Id(stray));
        assert_eq!(views[1].details.cake_name(), "Third cake");
        assert!(matches!(&views[2].ordered_by, OwnerRef::Profile(p) if p.name == "Emma"));
    }

    #[tokio::test]
    async fn test_custom_schema_orders() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Custom);

        let fields: OrderFields = serde_json::from_value(serde_json::json!({
            "cakeName": "Layered dream",
            "ingredients": [{ "layer": "sponge", "ingredient": "chocolate" }]
        }))
        .unwrap();
        let view = ledger.place_order(&owner, &fields).await.unwrap();
        assert!(matches!(view.details, CakeDetails::Custom(_)));

        // Classic fields are rejected under the custom schema
        assert!(matches!(
            ledger.place_order(&owner, &emmas_cake()).await,
            Err(OrderError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_find_view_matches_placed_order() {
        let store = MemoryStore::new();
        let owner = emma(&store).await;
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);

        let placed = ledger.place_order(&owner, &emmas_cake()).await.unwrap();
        let fetched = ledger.find_view(placed.id).await.unwrap();
        assert_eq!(
            serde_json::to_value(&fetched).unwrap(),
            serde_json::to_value(&placed).unwrap()
        );

        let stray = UserId::generate();
        let orphan = ledger.create_order(stray, &emmas_cake()).await.unwrap();
        let view = ledger.find_view(orphan.id).await.unwrap();
        assert_eq!(view.ordered_by, OwnerRef::Id(stray));
    }

    #[tokio::test]
    async fn test_find_unknown_order() {
        let store = MemoryStore::new();
        let ledger = OrderLedger::new(&store, OrderSchema::Classic);
        assert!(matches!(
            ledger.find_by_id(OrderId::generate()).await,
            Err(OrderError::NotFound)
        ));
    }
}
