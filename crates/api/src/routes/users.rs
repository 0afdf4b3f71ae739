//! User routes: signup, listing and profiles.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use cake_maker_core::{AccessToken, UserId};

use super::extract::{ApiJson, ApiPath, ApiQuery, ListQuery};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{FieldErrorKind, SignupFields, UserListing, UserProfile, ValidationErrors};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Response to a successful signup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    message: &'static str,
    user_id: UserId,
    access_token: AccessToken,
}

/// An unreadable signup body is reported in the same `{message, errors}`
/// shape as a rejected field.
fn unreadable_signup(err: AppError) -> AppError {
    match err {
        AppError::BadRequest(detail) => AuthError::Validation(ValidationErrors::single(
            "body",
            FieldErrorKind::Invalid,
            detail,
        ))
        .into(),
        other => other,
    }
}

/// `POST /users`
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<ApiJson<SignupFields>, AppError>,
) -> Result<(StatusCode, Json<CreatedUser>)> {
    let ApiJson(fields) = body.map_err(unreadable_signup)?;
    let user = state.users().create_user(&fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            message: "User created.",
            user_id: user.id,
            access_token: user.access_token,
        }),
    ))
}

/// `GET /users`
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<UserListing>>> {
    let users = state.users().list_users(query.limit()).await?;
    Ok(Json(users.into_iter().map(UserListing::from).collect()))
}

/// `GET /users/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireUser(_caller): RequireUser,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.users().profile(id).await?))
}
