pub mod sql_service;
pub mod stats_service;

pub use sql_service::{SqlConsoleClient, SqlExecution, SqlServiceError};
pub use stats_service::{Photo, StatsService};
