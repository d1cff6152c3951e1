/// Middleware module
///
/// Request authentication and file server hit counting.

mod authenticated_user;
mod hit_counter;

pub use authenticated_user::AuthenticatedUser;
pub use hit_counter::HitCounterMiddleware;
