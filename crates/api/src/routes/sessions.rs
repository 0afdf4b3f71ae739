//! Sign-in.

use axum::{Json, extract::State};
use serde::Deserialize;

use super::extract::ApiJson;
use crate::error::Result;
use crate::models::SessionGrant;
use crate::state::AppState;

/// Sign-in request body.
#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// `POST /sessions`
///
/// Exchanges email and password for the user's access token.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignInForm>,
) -> Result<Json<SessionGrant>> {
    let user = state
        .users()
        .authenticate(&form.email, &form.password)
        .await?;

    tracing::info!(user_id = %user.id, "User signed in");
    Ok(Json(SessionGrant::from(user)))
}
