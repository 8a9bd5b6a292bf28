//! Random identifier and token generation.

use base64::Engine as _;
use rand::{Rng, distr::Alphanumeric};

/// Length of store-assigned document ids.
pub const DOCUMENT_ID_LENGTH: usize = 20;

/// Length of random bytes behind a session token before base64 encoding.
const SESSION_TOKEN_BYTES: usize = 32;

/// Generates a 20-character alphanumeric document id.
pub fn generate_document_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Generates a cryptographically secure session token.
///
/// Uses `getrandom` for entropy and encodes 32 bytes as URL-safe base64
/// without padding, producing a 43-character token.
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_session_token() -> String {
    let mut buffer = [0u8; SESSION_TOKEN_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
