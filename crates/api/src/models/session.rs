//! Types describing an authenticated caller.

use serde::Serialize;

use cake_maker_core::{AccessToken, Email, UserId};

use super::user::{User, UserSummary};

/// The identity the authorization gate attaches to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<CurrentUser> for UserSummary {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Credentials handed to a client after a successful sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub user_id: UserId,
    pub access_token: AccessToken,
}

impl From<User> for SessionGrant {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            access_token: user.access_token,
        }
    }
}
