// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route in this tier sits behind `bearer_auth_middleware`; handlers can
// rely on a `BearerToken` extension being present.

pub mod lists;
pub mod messages;
pub mod sql;
pub mod stats;
pub mod users;
pub mod wines;
