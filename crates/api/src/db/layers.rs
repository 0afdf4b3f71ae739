//! Layer catalog persistence in `PostgreSQL`.

use async_trait::async_trait;
use sqlx::types::Json;

use cake_maker_core::LayerId;

use super::{CatalogStore, PgStore, RepositoryError};
use crate::models::{Ingredient, Layer, NewLayer};

#[derive(sqlx::FromRow)]
struct LayerRow {
    id: LayerId,
    name: String,
    ingredients: Json<Vec<Ingredient>>,
}

impl From<LayerRow> for Layer {
    fn from(row: LayerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            ingredients: row.ingredients.0,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn replace_layers(&self, layers: &[NewLayer]) -> Result<Vec<Layer>, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM layer").execute(&mut *tx).await?;

        let mut inserted = Vec::with_capacity(layers.len());
        for (position, layer) in (0_i32..).zip(layers) {
            let row = sqlx::query_as::<_, LayerRow>(
                r"
                INSERT INTO layer (position, name, ingredients)
                VALUES ($1, $2, $3)
                RETURNING id, name, ingredients
                ",
            )
            .bind(position)
            .bind(&layer.name)
            .bind(Json(&layer.ingredients))
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(Layer::from(row));
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list_layers(&self) -> Result<Vec<Layer>, RepositoryError> {
        let rows = sqlx::query_as::<_, LayerRow>(
            "SELECT id, name, ingredients FROM layer ORDER BY position",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Layer::from).collect())
    }
}
