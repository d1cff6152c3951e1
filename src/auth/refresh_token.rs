/// Refresh Token Management
///
/// Refresh tokens are opaque, long-lived and revocable:
/// - 32 bytes from the OS random source, hex encoded (64 characters)
/// - Persisted with their owner, expiry and revocation time
/// - Valid iff not revoked and the current time is before `expires_at`
/// - Not rotated on refresh; the same token works until it expires or is
///   revoked
///
/// The durable side is behind `RefreshTokenStore`, see `crate::store` for
/// the Postgres and in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{AppError, AuthError, DatabaseError};

/// Random bytes per token; the hex form is twice as long
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Attempts before a primary key collision is reported instead of retried
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Lifecycle state of a refresh token, evaluated at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Active,
    Revoked,
    Expired,
}

/// A persisted refresh token
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// A fresh, unpersisted token for `user_id`
    ///
    /// # Errors
    /// Returns error if the OS random source fails
    pub fn issue(user_id: Uuid, now: DateTime<Utc>, lifetime: Duration) -> Result<Self, AppError> {
        Ok(Self {
            token: generate_refresh_token()?,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + lifetime,
            revoked_at: None,
        })
    }

    /// Revocation wins over expiry so logs show the explicit transition
    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked_at.is_some() {
            TokenState::Revoked
        } else if now >= self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    /// The owner, if the token may still mint access tokens
    pub fn ensure_active(&self, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        match self.state(now) {
            TokenState::Active => Ok(self.user_id),
            TokenState::Revoked => Err(AuthError::Revoked),
            TokenState::Expired => Err(AuthError::Expired),
        }
    }
}

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// Returns error if the OS random source is unavailable
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Random source unavailable: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Durable storage for refresh tokens
///
/// Implementations must report a duplicate `token` as
/// `DatabaseError::UniqueConstraintViolation` from `insert` and must never
/// overwrite an existing row.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// How long newly created tokens stay valid
    fn lifetime(&self) -> Duration;

    /// Persist a token that does not exist yet
    async fn insert(&self, token: &RefreshToken) -> Result<(), AppError>;

    /// Fetch a token by value
    ///
    /// # Errors
    /// `AuthError::NotFound` if absent
    async fn lookup_owner(&self, token: &str) -> Result<RefreshToken, AppError>;

    /// Set `revoked_at` to now. Revoking twice is not an error.
    ///
    /// # Errors
    /// `AuthError::NotFound` if absent
    async fn revoke(&self, token: &str) -> Result<(), AppError>;

    /// Generate, persist and return a new token for `user_id`
    ///
    /// A collision on the token value is retried with a new value.
    async fn create(&self, user_id: Uuid) -> Result<RefreshToken, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let token = RefreshToken::issue(user_id, Utc::now(), self.lifetime())?;

            match self.insert(&token).await {
                Ok(()) => return Ok(token),
                Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_))) => {
                    tracing::warn!(attempt, user_id = %user_id, "Refresh token collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
            "refresh token".to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = generate_refresh_token().unwrap();
        let second = generate_refresh_token().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_new_token_is_active() {
        let now = Utc::now();
        let token = RefreshToken::issue(Uuid::new_v4(), now, Duration::days(60)).unwrap();

        assert_eq!(token.expires_at - token.created_at, Duration::days(60));
        assert_eq!(token.state(now), TokenState::Active);
        assert_eq!(token.ensure_active(now), Ok(token.user_id));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = RefreshToken::issue(Uuid::new_v4(), now, Duration::seconds(30)).unwrap();

        assert_eq!(token.state(token.expires_at - Duration::seconds(1)), TokenState::Active);
        assert_eq!(token.state(token.expires_at), TokenState::Expired);
        assert_eq!(token.ensure_active(token.expires_at), Err(AuthError::Expired));
    }

    #[test]
    fn test_revoked_is_terminal() {
        let now = Utc::now();
        let mut token = RefreshToken::issue(Uuid::new_v4(), now, Duration::days(1)).unwrap();
        token.revoked_at = Some(now);

        assert_eq!(token.state(now), TokenState::Revoked);
        assert_eq!(token.state(now + Duration::days(2)), TokenState::Revoked);
        assert_eq!(token.ensure_active(now), Err(AuthError::Revoked));
    }

    /// Rejects the first `collisions` inserts as duplicates.
    struct CollidingStore {
        collisions: usize,
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl RefreshTokenStore for CollidingStore {
        fn lifetime(&self) -> Duration {
            Duration::days(60)
        }

        async fn insert(&self, _token: &RefreshToken) -> Result<(), AppError> {
            let n = self.inserts.fetch_add(1, Ordering::SeqCst);
            if n < self.collisions {
                Err(DatabaseError::UniqueConstraintViolation("token".into()).into())
            } else {
                Ok(())
            }
        }

        async fn lookup_owner(&self, _token: &str) -> Result<RefreshToken, AppError> {
            Err(AuthError::NotFound.into())
        }

        async fn revoke(&self, _token: &str) -> Result<(), AppError> {
            Err(AuthError::NotFound.into())
        }
    }

    #[tokio::test]
    async fn test_create_retries_collision() {
        let store = CollidingStore { collisions: 1, inserts: AtomicUsize::new(0) };
        let user_id = Uuid::new_v4();

        let token = store.create(user_id).await.expect("retry should succeed");

        assert_eq!(token.user_id, user_id);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_repeated_collisions() {
        let store = CollidingStore { collisions: usize::MAX, inserts: AtomicUsize::new(0) };

        let result = store.create(Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_)))
        ));
        assert_eq!(store.inserts.load(Ordering::SeqCst), MAX_CREATE_ATTEMPTS);
    }
}
