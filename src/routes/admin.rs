use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::metrics::HitCounter;
use crate::store::UserStore;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<HitCounter>) -> HttpResponse {
    let body = format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        hits.get()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user. Deleting users removes
/// their refresh tokens and chirps too. Only allowed when
/// `application.platform` is `dev`.
pub async fn reset(
    app: web::Data<ApplicationSettings>,
    hits: web::Data<HitCounter>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    if !app.is_dev() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    hits.reset();
    let deleted = users.delete_all().await?;

    tracing::warn!(deleted_users = deleted, "Admin reset performed");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and database reset to initial state."))
}
