/// Credential and session authority
///
/// Composes the password hasher, access token codec, refresh token store and
/// header extractor into the operations handlers call. Holds no mutable
/// state: access tokens are verified statelessly and refresh token state
/// lives in the store.

use std::sync::Arc;

use actix_web::http::header::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::extract::bearer_token;
use crate::auth::jwt::{issue_access_token, verify_access_token};
use crate::auth::password::verify_password;
use crate::auth::refresh_token::{RefreshToken, RefreshTokenStore};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{User, UserStore};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

#[derive(Clone)]
pub struct Authority {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    jwt: JwtSettings,
}

impl Authority {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        jwt: JwtSettings,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt,
        }
    }

    /// Check email and password, then mint an access and a refresh token
    ///
    /// # Errors
    /// `AuthError::Unauthorized` whether the email is unknown or the password
    /// is wrong, so callers cannot probe for registered addresses.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let credentials = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(password, &credentials.hashed_password)? {
            return Err(AuthError::Unauthorized.into());
        }

        let user = credentials.user;
        let access_token = self.issue_for(user.id)?;
        let refresh_token = self.refresh_tokens.create(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from the bearer refresh token
    ///
    /// The refresh token is not rotated.
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let token = bearer_token(headers)?;
        let record = self.refresh_tokens.lookup_owner(token).await?;

        let user_id = record.ensure_active(Utc::now()).map_err(|kind| {
            tracing::warn!(user_id = %record.user_id, kind = ?kind, "Refresh with unusable token");
            kind
        })?;

        self.issue_for(user_id)
    }

    /// Revoke the bearer refresh token
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let token = bearer_token(headers)?;
        self.refresh_tokens.revoke(token).await
    }

    /// The user behind the bearer access token. No store lookup.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = bearer_token(headers)?;
        verify_access_token(token, &self.jwt.secret, &self.jwt.issuer)
    }

    fn issue_for(&self, user_id: Uuid) -> Result<String, AppError> {
        issue_access_token(
            user_id,
            &self.jwt.secret,
            self.jwt.access_token_ttl(),
            &self.jwt.issuer,
        )
    }
}
