//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationErrors;

/// Errors that can occur during credential and directory operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more signup fields were rejected.
    #[error("invalid signup fields ({} field(s))", .0.len())]
    Validation(ValidationErrors),

    /// A user with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// Invalid credentials (malformed email, unknown email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Password too short to hash.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
