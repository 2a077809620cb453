use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Row of `wine_cockpit_auth`. The password hash never leaves the repository.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminAccount {
    pub id: i64,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}
