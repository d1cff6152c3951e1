/// Refresh Token Routes
///
/// Both endpoints read the refresh token from `Authorization: Bearer`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::auth::Authority;
use crate::error::AppError;

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/refresh
///
/// Mints a new access token. The refresh token itself is unchanged.
///
/// # Errors
/// - 401: missing, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    authority: web::Data<Authority>,
) -> Result<HttpResponse, AppError> {
    let token = authority.refresh(req.headers()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 401: missing or unknown refresh token
pub async fn revoke(
    req: HttpRequest,
    authority: web::Data<Authority>,
) -> Result<HttpResponse, AppError> {
    authority.revoke(req.headers()).await?;
    tracing::info!("Refresh token revoked");
    Ok(HttpResponse::NoContent().finish())
}
