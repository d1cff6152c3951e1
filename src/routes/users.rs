/// User Routes
///
/// Account creation and login.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, validate_password_strength, Authority};
use crate::error::{AppError, ErrorContext};
use crate::store::{User, UserStore};
use crate::validators::is_valid_email;

/// Body of both create-user and login requests
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the user plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or password outside the length policy
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_user");

    let email = is_valid_email(&form.email)?;
    validate_password_strength(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = users
        .create_user(&email, &hashed_password)
        .await
        .map_err(|e| context.record(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/login
///
/// # Errors
/// - 401: unknown email or wrong password, with the same body for both
pub async fn login(
    form: web::Json<CredentialsRequest>,
    authority: web::Data<Authority>,
) -> Result<HttpResponse, AppError> {
    let outcome = authority.login(form.email.trim(), &form.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: outcome.user,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token.token,
    }))
}
