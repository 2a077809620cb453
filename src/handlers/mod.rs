// handlers/mod.rs - handler tiers
//
// Public (no auth) → Protected (bearer token) → Pages (session cookie)

pub mod pages;
pub mod protected;
pub mod public;
