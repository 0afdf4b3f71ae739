//! User directory: signup, lookup and sign-in over the user store.

use cake_maker_core::{Email, OrderId, UserId};

use super::auth::{AuthError, password, token};
use crate::db::{RepositoryError, Store};
use crate::models::{
    FieldErrorKind, NewUser, SignupFields, User, UserProfile, ValidationErrors,
};

/// User directory service.
///
/// Borrowed per request from [`AppState`](crate::state::AppState).
pub struct UserDirectory<'a> {
    store: &'a dyn Store,
}

/// Signup fields that passed validation.
struct Signup {
    name: String,
    email: Email,
    password: String,
}

impl<'a> UserDirectory<'a> {
    /// Create a directory over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// The returned record is the only place besides sign-in where the
    /// access token leaves the directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with every rejected field.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    pub async fn create_user(&self, fields: &SignupFields) -> Result<User, AuthError> {
        let signup = validate_signup(fields).map_err(AuthError::Validation)?;
        let password_hash = password::hash(&signup.password)?;

        let user = self
            .store
            .insert_user(NewUser {
                name: signup.name,
                email: signup.email,
                password_hash,
                access_token: token::issue(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Up to `limit` users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn list_users(&self, limit: usize) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_users(limit).await?)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn find_by_id(&self, id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has this email.
    pub async fn find_by_email(&self, email: &Email) -> Result<User, AuthError> {
        self.store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Record that `user` placed `order`. Recording the same order twice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn record_order(&self, user: UserId, order: OrderId) -> Result<(), AuthError> {
        self.store
            .append_order(user, order)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a malformed email, an
    /// unknown email or a wrong password alike.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match Email::parse(email) {
            Ok(email) => match self.find_by_email(&email).await {
                Ok(user) => Some(user),
                Err(AuthError::UserNotFound) => None,
                Err(e) => return Err(e),
            },
            Err(_) => None,
        };

        let Some(user) = user else {
            password::verify_dummy(password);
            tracing::debug!("Sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify(password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// The user holding `token`, if any. An empty token never resolves.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn resolve_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get_user_by_token(token).await?)
    }

    /// A user with their placed orders resolved.
    ///
    /// Order ids that no longer resolve are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn profile(&self, id: UserId) -> Result<UserProfile, AuthError> {
        let user = self.find_by_id(id).await?;
        let orders = self.store.get_orders(&user.ordered_cakes).await?;
        Ok(UserProfile::new(user, orders))
    }
}

/// Check every signup field, collecting all failures.
fn validate_signup(fields: &SignupFields) -> Result<Signup, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = errors.require_text("name", fields.name.as_deref(), 1);

    let email = match fields.email.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("email", FieldErrorKind::Required, "email is required");
            None
        }
        Some(raw) => match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.add("email", FieldErrorKind::Invalid, e.to_string());
                None
            }
        },
    };

    // Passwords are taken verbatim, never trimmed
    let password = match fields.password.as_deref() {
        None | Some("") => {
            errors.add("password", FieldErrorKind::Required, "password is required");
            None
        }
        Some(p) if p.chars().count() < password::MIN_PASSWORD_LENGTH => {
            errors.add(
                "password",
                FieldErrorKind::MinLength,
                format!(
                    "password must be at least {} characters",
                    password::MIN_PASSWORD_LENGTH
                ),
            );
            None
        }
        Some(p) => Some(p.to_owned()),
    };

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(Signup {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}
