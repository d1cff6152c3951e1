use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{Chirp, ChirpStore, User, UserCredentials, UserStore};
use crate::auth::{RefreshToken, RefreshTokenStore};
use crate::error::{AppError, AuthError, DatabaseError};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserCredentials>,
    refresh_tokens: HashMap<String, RefreshToken>,
    /// insertion order, which is also `created_at` order
    chirps: Vec<Chirp>,
}

/// In-process store with the same contract as `PgStore`
///
/// One mutex covers users, tokens and chirps so a user delete and its
/// cascade are atomic. The lock is never held across an await point.
pub struct MemoryStore {
    state: Mutex<State>,
    refresh_token_lifetime: Duration,
}

impl MemoryStore {
    pub fn new(refresh_token_lifetime: Duration) -> Self {
        Self {
            state: Mutex::new(State::default()),
            refresh_token_lifetime,
        }
    }

    pub fn refresh_token_count(&self) -> usize {
        self.state().map(|s| s.refresh_tokens.len()).unwrap_or(0)
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut state = self.state()?;

        if state.users.values().any(|c| c.user.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(email.to_string()).into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            is_chirpy_red: false,
        };
        state.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                hashed_password: hashed_password.to_string(),
            },
        );

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let state = self.state()?;
        Ok(state.users.values().find(|c| c.user.email == email).cloned())
    }

    async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut state = self.state()?;
        let credentials = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user".to_string()))?;

        credentials.user.is_chirpy_red = true;
        credentials.user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut state = self.state()?;
        let deleted = state.users.len() as u64;
        state.users.clear();
        state.refresh_tokens.clear();
        state.chirps.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    fn lifetime(&self) -> Duration {
        self.refresh_token_lifetime
    }

    async fn insert(&self, token: &RefreshToken) -> Result<(), AppError> {
        let mut state = self.state()?;

        if !state.users.contains_key(&token.user_id) {
            return Err(AuthError::NotFound.into());
        }
        if state.refresh_tokens.contains_key(&token.token) {
            return Err(DatabaseError::UniqueConstraintViolation("refresh token".to_string()).into());
        }

        state.refresh_tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn lookup_owner(&self, token: &str) -> Result<RefreshToken, AppError> {
        let state = self.state()?;
        state
            .refresh_tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::NotFound.into())
    }

    async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let mut state = self.state()?;
        let stored = state
            .refresh_tokens
            .get_mut(token)
            .ok_or(AppError::Auth(AuthError::NotFound))?;

        let now = Utc::now();
        stored.revoked_at.get_or_insert(now);
        stored.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let mut state = self.state()?;

        if !state.users.contains_key(&user_id) {
            return Err(AuthError::NotFound.into());
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        state.chirps.push(chirp.clone());

        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, AppError> {
        Ok(self.state()?.chirps.clone())
    }

    async fn get_chirp(&self, chirp_id: Uuid) -> Result<Option<Chirp>, AppError> {
        let state = self.state()?;
        Ok(state.chirps.iter().find(|c| c.id == chirp_id).cloned())
    }
}
