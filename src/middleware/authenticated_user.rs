/// Access token extractor
///
/// Handlers that take an `AuthenticatedUser` argument only run for requests
/// carrying a valid `Authorization: Bearer <access token>` header. The
/// check is stateless; see `Authority::authenticate`.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::Authority;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let authority = req
        .app_data::<web::Data<Authority>>()
        .ok_or_else(|| AppError::Internal("Authority is not configured".to_string()))?;

    let user_id = authority.authenticate(req.headers())?;

    tracing::debug!(user_id = %user_id, "Access token validated");
    Ok(AuthenticatedUser { user_id })
}
