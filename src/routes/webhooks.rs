/// Payment Provider Webhooks
///
/// Polka calls this endpoint when a user pays for Chirpy Red. The API key
/// is checked before the body is even parsed.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::verify_api_key;
use crate::configuration::PolkaSettings;
use crate::error::{AppError, ValidationError};
use crate::store::UserStore;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    data: Option<WebhookData>,
}

#[derive(Deserialize)]
struct WebhookData {
    user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// # Errors
/// - 401: missing or wrong API key
/// - 400: body is not a webhook event
/// - 404: upgraded user does not exist
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    polka: web::Data<PolkaSettings>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    verify_api_key(req.headers(), &polka.api_key)?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|_| ValidationError::InvalidFormat("webhook payload"))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let data = event
        .data
        .ok_or(ValidationError::EmptyField("data"))?;

    users.upgrade_to_chirpy_red(data.user_id).await?;
    tracing::info!(user_id = %data.user_id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
