//! Cake order persistence in `PostgreSQL`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use cake_maker_core::{OrderId, UserId};

use super::{OrderStore, PgStore, RepositoryError, sql_limit};
use crate::models::{CakeDetails, NewOrder, Order};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    details: Json<CakeDetails>,
    ordered_by: UserId,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            details: row.details.0,
            created_at: row.created_at,
            ordered_by: row.ordered_by,
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO cake_order (details, ordered_by)
            VALUES ($1, $2)
            RETURNING id, details, ordered_by, created_at
            ",
        )
        .bind(Json(&order.details))
        .bind(order.ordered_by)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn list_orders(&self, limit: usize) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, details, ordered_by, created_at
            FROM cake_order
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(sql_limit(limit))
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, details, ordered_by, created_at
            FROM cake_order
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Order::from))
    }

    async fn get_orders(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(OrderId::as_uuid).collect();
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, details, ordered_by, created_at
            FROM cake_order
            WHERE id = ANY($1)
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool())
        .await?;

        let mut by_id: HashMap<OrderId, Order> = rows
            .into_iter()
            .map(|row| (row.id, Order::from(row)))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
