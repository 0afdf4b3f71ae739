//! Layer catalog commands.

use cake_maker_api::db::PgStore;
use cake_maker_api::services::Catalog;

use super::{CommandError, connect};

/// Replace the stored catalog with the built-in seed set.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be reached or the reload fails.
pub async fn reset() -> Result<(), CommandError> {
    let store = PgStore::new(connect().await?);

    let layers = Catalog::new(&store).reload().await?;
    for layer in &layers {
        tracing::info!(
            layer = %layer.name,
            ingredients = layer.ingredients.len(),
            "Seeded layer"
        );
    }

    tracing::info!(layers = layers.len(), "Catalog reset complete!");
    Ok(())
}
