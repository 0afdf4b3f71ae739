//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing and access token issuing
//! - `users` - User directory (signup, sign-in, token resolution)
//! - `orders` - Order ledger (validation, placement, listing)
//! - `catalog` - Layer catalog
//!
//! Services borrow the store from [`AppState`](crate::state::AppState) and
//! are cheap to construct per request.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod users;

pub use catalog::{Catalog, CatalogError};
pub use orders::{OrderError, OrderLedger};
pub use users::UserDirectory;
