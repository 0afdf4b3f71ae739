//! Access token issuing.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use cake_maker_core::AccessToken;

/// Random bytes per token.
pub const TOKEN_BYTES: usize = 128;

/// Generate a fresh bearer token from the thread-local CSPRNG.
///
/// The token carries no information about the user it is issued to.
#[must_use]
pub fn issue() -> AccessToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    AccessToken::new(URL_SAFE_NO_PAD.encode(bytes))
}
