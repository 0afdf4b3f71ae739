//! Request extractors that reject with [`AppError`] JSON bodies instead of
//! axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Most records a list endpoint returns.
pub const MAX_LIST_LIMIT: usize = 20;

/// `?limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

impl ListQuery {
    /// The requested limit clamped to `1..=MAX_LIST_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(MAX_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}
