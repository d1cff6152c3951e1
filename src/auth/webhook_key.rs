/// Static API key check for the payment provider webhook

use actix_web::http::header::HeaderMap;
use sha2::{Digest, Sha256};

use crate::auth::extract::api_key;
use crate::error::AuthError;

/// Accepts the request only if `Authorization: ApiKey <key>` matches
/// `expected` exactly.
///
/// # Errors
/// `MissingHeader`/`Malformed` from header parsing, `InvalidApiKey` for a
/// wrong key
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let provided = api_key(headers)?;

    // equal-length digests so the comparison time does not depend on the key
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    if constant_time_eq(&provided, &expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
