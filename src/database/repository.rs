use std::collections::HashSet;

use sqlx::Row;
use tracing::debug;

use crate::database::manager::{loggable_param, Database, DatabaseError};
use crate::database::models::{AdminAccount, UserStats, WineDetail};

/// Single-purpose queries and mutations of the cockpit. Listing goes through
/// the list engine instead.
#[derive(Clone)]
pub struct CockpitRepository {
    db: Database,
}

impl CockpitRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Look up an admin account whose stored crypt hash matches `password_hash`.
    pub async fn find_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminAccount>, DatabaseError> {
        debug!("Looking up cockpit account for {}", loggable_param(email));

        self.db
            .with_retry("find_account", |pool| async move {
                sqlx::query_as::<_, AdminAccount>(
                    r#"
                    SELECT id::bigint AS id, email, created_at::timestamptz AS created_at, last_login::timestamptz AS last_login
                    FROM wine_cockpit_auth
                    WHERE email = $1
                    AND password_hash = crypt($2, password_hash)
                    "#,
                )
                .bind(email)
                .bind(password_hash)
                .fetch_optional(&pool)
                .await
            })
            .await
    }

    pub async fn touch_last_login(&self, email: &str) -> Result<(), DatabaseError> {
        self.db
            .with_write_retry("touch_last_login", |pool| async move {
                sqlx::query("UPDATE wine_cockpit_auth SET last_login = NOW() WHERE email = $1")
                    .bind(email)
                    .execute(&pool)
                    .await
            })
            .await?;
        Ok(())
    }

    /// Flip `has_proaccount` and return the new value.
    pub async fn toggle_pro(&self, user_id: i64) -> Result<bool, DatabaseError> {
        let row = self
            .db
            .with_write_retry("toggle_pro", |pool| async move {
                sqlx::query(
                    r#"
                    UPDATE wine_users
                    SET has_proaccount = NOT COALESCE(has_proaccount, false)
                    WHERE id = $1
                    RETURNING has_proaccount
                    "#,
                )
                .bind(user_id)
                .fetch_optional(&pool)
                .await
            })
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<bool, _>("has_proaccount")?),
            None => Err(DatabaseError::NotFound(format!("User {} not found", user_id))),
        }
    }

    pub async fn delete_message(&self, message_id: i64) -> Result<(), DatabaseError> {
        let result = self
            .db
            .with_write_retry("delete_message", |pool| async move {
                sqlx::query("DELETE FROM wine_contact WHERE id = $1")
                    .bind(message_id)
                    .execute(&pool)
                    .await
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Message {} not found", message_id)));
        }
        Ok(())
    }

    pub async fn wine_detail(&self, wine_id: i64) -> Result<WineDetail, DatabaseError> {
        let wine = self
            .db
            .with_retry("wine_detail", |pool| async move {
                sqlx::query_as::<_, WineDetail>(
                    r#"
                    SELECT
                        name::text AS name,
                        producer::text AS producer,
                        grapes::text AS grapes,
                        country::text AS country,
                        region::text AS region,
                        year::text AS year,
                        price::text AS price,
                        quantity::text AS quantity
                    FROM wine_table
                    WHERE id = $1
                    "#,
                )
                .bind(wine_id)
                .fetch_optional(&pool)
                .await
            })
            .await?;

        wine.ok_or_else(|| DatabaseError::NotFound(format!("Wine {} not found", wine_id)))
    }

    /// Every wine id rendered as text, for matching against media folder names.
    pub async fn wine_ids(&self) -> Result<HashSet<String>, DatabaseError> {
        let rows = self
            .db
            .with_retry("wine_ids", |pool| async move {
                sqlx::query("SELECT id::text AS id FROM wine_table")
                    .fetch_all(&pool)
                    .await
            })
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("id").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn user_stats(&self) -> Result<UserStats, DatabaseError> {
        let row = self
            .db
            .with_retry("user_stats", |pool| async move {
                sqlx::query(
                    r#"
                    SELECT
                        COUNT(*) AS total,
                        COUNT(*) FILTER (WHERE has_proaccount) AS pro
                    FROM wine_users
                    "#,
                )
                .fetch_one(&pool)
                .await
            })
            .await?;

        Ok(UserStats {
            total: row.try_get("total")?,
            pro: row.try_get("pro")?,
        })
    }

    pub async fn wine_count(&self) -> Result<i64, DatabaseError> {
        self.count("wine_count", "SELECT COUNT(*) AS total FROM wine_table").await
    }

    pub async fn message_count(&self) -> Result<i64, DatabaseError> {
        self.count("message_count", "SELECT COUNT(*) AS total FROM wine_contact").await
    }

    async fn count(&self, label: &str, query: &'static str) -> Result<i64, DatabaseError> {
        let row = self
            .db
            .with_retry(label, |pool| async move { sqlx::query(query).fetch_one(&pool).await })
            .await?;
        Ok(row.try_get("total")?)
    }
}
