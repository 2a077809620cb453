pub mod auth;
pub mod cors;
pub mod session;

pub use auth::{bearer_auth_middleware, AuthUser, BearerToken};
pub use cors::{cors_layer, origin_guard_middleware};
pub use session::session_cookie_middleware;
