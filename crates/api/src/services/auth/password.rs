//! Password hashing and verification.
//!
//! Digests are Argon2id PHC strings; the random salt and the parameters are
//! embedded in the string, so verification needs nothing else.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;
use crate::models::PasswordDigest;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Digest verified against when no real one exists, so an unknown email
/// costs the same as a wrong password.
static DUMMY_DIGEST: LazyLock<Option<PasswordDigest>> =
    LazyLock::new(|| hash("cake-maker-dummy-password").ok());

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is shorter than
/// [`MIN_PASSWORD_LENGTH`] characters.
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash(password: &str) -> Result<PasswordDigest, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?
        .to_string();

    Ok(PasswordDigest::new(phc))
}

/// Check a password against a stored digest.
///
/// A digest that cannot be parsed never matches.
#[must_use]
pub fn verify(password: &str, digest: &PasswordDigest) -> bool {
    let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification for a sign-in attempt that has no user behind it.
pub fn verify_dummy(password: &str) {
    if let Some(digest) = DUMMY_DIGEST.as_ref() {
        let _ = verify(password, digest);
    }
}
