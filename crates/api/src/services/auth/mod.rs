//! Credentials and bearer tokens.
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`token`]: opaque access token generation

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
