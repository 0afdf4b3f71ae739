//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is JSON with at least `message`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{FieldErrorKind, ValidationErrors};
use crate::services::auth::AuthError;
use crate::services::{CatalogError, OrderError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential or user directory operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order ledger operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not signed in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    logged_out: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    not_found: bool,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            logged_out: false,
            not_found: false,
        }
    }

    fn with_errors(message: impl Into<String>, errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(message)
        }
    }
}

impl AppError {
    /// Whether this error is the server's fault rather than the client's.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Catalog(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
                | Self::Order(OrderError::Repository(_) | OrderError::Unlinked { .. })
        )
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        const INTERNAL: &str = "Internal server error";

        match self {
            Self::Catalog(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(INTERNAL)),
            Self::Auth(err) => match err {
                AuthError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::with_errors("Could not create user.", errors),
                ),
                AuthError::DuplicateEmail => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::with_errors(
                        "Could not create user.",
                        ValidationErrors::single(
                            "email",
                            FieldErrorKind::Unique,
                            "email already registered",
                        ),
                    ),
                ),
                AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
                AuthError::InvalidCredentials => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        not_found: true,
                        ..ErrorBody::new("Invalid email or password.")
                    },
                ),
                AuthError::UserNotFound => {
                    (StatusCode::BAD_REQUEST, ErrorBody::new("User not found."))
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(INTERNAL))
                }
            },
            Self::Order(err) => match err {
                OrderError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::with_errors("Could not create cake order.", errors),
                ),
                OrderError::NotFound => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("Cake order not found."),
                ),
                OrderError::Unlinked { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(
                        "Cake order was saved but could not be added to your account.",
                    ),
                ),
                OrderError::Repository(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(INTERNAL))
                }
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            Self::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    logged_out: true,
                    ..ErrorBody::new(msg)
                },
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use crate::db::RepositoryError;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("cake-123".to_string());
        assert_eq!(err.to_string(), "Not found: cake-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::UserNotFound.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::NotFound.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::Repository(RepositoryError::NotFound).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_credentials_body() {
        let (status, body) = response_parts(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["notFound"], true);
        assert!(body.get("loggedOut").is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let (status, body) =
            response_parts(AppError::Unauthorized("Please sign in.".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Please sign in.");
        assert_eq!(body["loggedOut"], true);
    }

    #[tokio::test]
    async fn test_duplicate_email_body() {
        let (status, body) = response_parts(AuthError::DuplicateEmail.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Could not create user.");
        assert_eq!(body["errors"]["email"]["kind"], "unique");
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = AppError::Order(OrderError::Repository(RepositoryError::DataCorruption(
            "secret table detail".to_string(),
        )));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("secret table detail"));
    }
}
