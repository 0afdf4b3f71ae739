//! Layer catalog route.

use axum::{Json, extract::State};

use crate::error::{AppError, Result};
use crate::models::Layer;
use crate::state::AppState;

/// `GET /layers`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Layer>>> {
    let layers = state.catalog().list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list layers");
        AppError::NotFound("Could not fetch layers.".to_string())
    })?;

    Ok(Json(layers))
}
