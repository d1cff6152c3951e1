/// Persistence backends
///
/// `PgStore` is what the server runs on. `MemoryStore` keeps everything in
/// process and backs the test suite. Both implement `UserStore`,
/// `RefreshTokenStore` and `ChirpStore`, so deleting a user removes its
/// refresh tokens and chirps.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AuthError, DatabaseError};

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

/// A user together with the stored password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// # Errors
    /// `DatabaseError::UniqueConstraintViolation` if the email is taken
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError>;

    /// # Errors
    /// `AppError::NotFound` if there is no such user
    async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<(), AppError>;

    /// Delete every user along with their refresh tokens and chirps
    async fn delete_all(&self) -> Result<u64, AppError>;
}

/// A short post, owned by the user who created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    /// Store an already cleaned body for `user_id`
    ///
    /// # Errors
    /// `AuthError::NotFound` if the user no longer exists
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError>;

    /// Every chirp, oldest first
    async fn list_chirps(&self) -> Result<Vec<Chirp>, AppError>;

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, AppError>;
}

/// Writes keyed on a user that has since been deleted fail the same way as
/// an unknown token.
fn owner_missing(err: AppError) -> AppError {
    match err {
        AppError::Database(DatabaseError::ForeignKeyViolation(_)) => AuthError::NotFound.into(),
        other => other,
    }
}
