//! Cake order routes.

use axum::{Json, extract::State, http::StatusCode};

use cake_maker_core::OrderId;

use super::extract::{ApiJson, ApiPath, ApiQuery, ListQuery};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{OrderFields, OrderView};
use crate::state::AppState;

/// `GET /cakeorders`
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<OrderView>>> {
    let orders = state
        .orders()
        .list_orders(query.limit())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list cake orders");
            AppError::NotFound("Could not fetch cake orders.".to_string())
        })?;

    Ok(Json(orders))
}

/// `GET /cakeorders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireUser(_caller): RequireUser,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<OrderView>> {
    Ok(Json(state.orders().find_view(id).await?))
}

/// `POST /cakeorders`
///
/// Places an order for the signed-in user.
pub async fn create(
    State(state): State<AppState>,
    RequireUser(caller): RequireUser,
    ApiJson(fields): ApiJson<OrderFields>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let order = state.orders().place_order(&caller, &fields).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
