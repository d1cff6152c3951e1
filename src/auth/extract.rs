/// Credential extraction from request headers
///
/// Only `Authorization: <Scheme> <value>` is accepted. No query string or
/// cookie fallbacks.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// The token from `Authorization: Bearer <token>`
///
/// # Errors
/// - `MissingHeader` if there is no `Authorization` header
/// - `Malformed` if the scheme is not `Bearer` or no token follows
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    credential(headers, BEARER_SCHEME)
}

/// The key from `Authorization: ApiKey <key>`
///
/// # Errors
/// Same as [`bearer_token`]
pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    credential(headers, API_KEY_SCHEME)
}

fn credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let (given_scheme, rest) = value.split_once(' ').ok_or(AuthError::Malformed)?;

    if !given_scheme.eq_ignore_ascii_case(scheme) {
        return Err(AuthError::Malformed);
    }

    // exactly one separator and a single non-empty credential
    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return Err(AuthError::Malformed);
    }

    Ok(rest)
}
