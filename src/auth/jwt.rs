/// Access Token Generation and Validation
///
/// Access tokens are compact HS256 JWTs (`header.payload.signature`).
/// They are never stored: verification needs only the shared secret.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::{AppError, AuthError};

/// Sign a new access token for `user_id`
///
/// # Errors
/// Returns error if token encoding fails
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    issuer: &str,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, ttl, issuer);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify an access token and return its subject
///
/// The signature is checked first (constant-time, inside `jsonwebtoken`),
/// then expiry against the current clock with no leeway.
///
/// # Errors
/// - `Malformed`: not three segments, undecodable, wrong algorithm or
///   issuer, missing or non-UUID subject
/// - `InvalidSignature`: signed with a different secret or tampered with
/// - `Expired`: the current time is at or past `exp`
pub fn verify_access_token(token: &str, secret: &str, issuer: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked below so that `now == exp` counts as expired
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let kind = classify(&e);
        tracing::debug!(error = %e, kind = ?kind, "Access token rejected");
        kind
    })?;

    if claims.is_expired_at(Utc::now().timestamp()) {
        return Err(AuthError::Expired);
    }

    claims.user_id()
}

fn classify(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}
