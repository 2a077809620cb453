pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod list;
pub mod media;
pub mod middleware;
pub mod services;

pub use app::{router, AppState};
