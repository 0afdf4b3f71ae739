//! Authorization gate.
//!
//! Resolves the request's bearer token to a user before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// The token is read from the `Authorization` header, either bare or as
/// `Bearer <token>`. Missing, blank and unknown tokens are rejected with
/// 401 before the handler body runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

fn logged_out() -> AppError {
    AppError::Unauthorized("You must be signed in to do that.".to_string())
}

/// The token presented in the `Authorization` header, if any.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = presented_token(&parts.headers).ok_or_else(logged_out)?;

        let user = state
            .users()
            .resolve_token(token)
            .await?
            .ok_or_else(logged_out)?;
        let user = CurrentUser::from(&user);

        Span::current().record("user_id", tracing::field::display(user.id));
        set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}
