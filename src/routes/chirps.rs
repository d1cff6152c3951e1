/// Chirp Routes
///
/// Chirps are short text posts. Creating one requires an access token;
/// reading is public.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ValidationError};
use crate::middleware::AuthenticatedUser;
use crate::store::ChirpStore;
use crate::validators::clean_chirp_body;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct CleanedChirp {
    pub cleaned_body: String,
}

/// POST /api/validate_chirp
///
/// Length check and word filter only; nothing is stored.
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = clean_chirp_body(&form.body)?;
    Ok(HttpResponse::Ok().json(CleanedChirp { cleaned_body }))
}

/// POST /api/chirps
///
/// # Errors
/// - 401: missing or invalid access token, or its user no longer exists
/// - 400: body longer than 140 characters
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let body = clean_chirp_body(&form.body)?;
    let chirp = chirps.create_chirp(user.user_id, &body).await?;

    tracing::info!(chirp_id = %chirp.id, user_id = %user.user_id, "Chirp created");

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
///
/// All chirps, oldest first.
pub async fn list_chirps(chirps: web::Data<dyn ChirpStore>) -> Result<HttpResponse, AppError> {
    let chirps = chirps.list_chirps().await?;
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// # Errors
/// - 400: id is not a UUID
/// - 404: no such chirp
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<dyn ChirpStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path.into_inner())
        .map_err(|_| ValidationError::InvalidFormat("chirp id"))?;

    let chirp = chirps
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(chirp))
}
