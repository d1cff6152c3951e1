mod admin;
mod chirps;
mod health_check;
mod tokens;
mod users;
mod webhooks;

pub use admin::{metrics, reset};
pub use chirps::{create_chirp, get_chirp, list_chirps, validate_chirp};
pub use health_check::health_check;
pub use tokens::{refresh, revoke};
pub use users::{create_user, login};
pub use webhooks::polka_webhook;
