//! User domain types.
//!
//! [`User`] is the stored record and carries secrets. Only the projections
//! below are ever serialized.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cake_maker_core::{AccessToken, Email, OrderId, UserId};

use super::order::Order;

/// An Argon2 PHC string (algorithm, parameters, salt and hash).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a PHC string read back from storage.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Returns the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// A registered user (stored record).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID, assigned by the store.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized, unique email address.
    pub email: Email,
    /// Salted one-way password digest.
    pub password_hash: PasswordDigest,
    /// Bearer credential, fixed at creation.
    pub access_token: AccessToken,
    /// Orders placed by this user, oldest first.
    pub ordered_cakes: Vec<OrderId>,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a user. The store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordDigest,
    pub access_token: AccessToken,
}

/// Signup fields as sent by a client, before validation.
#[derive(Clone, Default, Deserialize)]
pub struct SignupFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SignupFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupFields")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Public identity of a user, embedded as the owner of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A user as shown by `GET /users`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListing {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub ordered_cakes: Vec<OrderId>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserListing {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            ordered_cakes: user.ordered_cakes,
            created_at: user.created_at,
        }
    }
}

/// A user with their orders resolved, as shown by `GET /users/:id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub ordered_cakes: Vec<Order>,
}

impl UserProfile {
    /// Combine a user with the orders their `ordered_cakes` point to.
    #[must_use]
    pub fn new(user: User, ordered_cakes: Vec<Order>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            ordered_cakes,
        }
    }
}
