/// Authentication module
///
/// Password hashing, access token signing/verification, refresh token
/// lifecycle, `Authorization` header parsing, and the `Authority` that ties
/// them together.

mod authority;
mod claims;
mod extract;
mod jwt;
mod password;
mod refresh_token;
mod webhook_key;

pub use authority::{Authority, LoginOutcome};
pub use claims::Claims;
pub use extract::{api_key, bearer_token};
pub use jwt::{issue_access_token, verify_access_token};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use refresh_token::{
    generate_refresh_token, RefreshToken, RefreshTokenStore, TokenState, REFRESH_TOKEN_BYTES,
};
pub use webhook_key::verify_api_key;
