use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Which failures a statement may be re-run after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Reads: any transient failure.
    Read,
    /// Mutations: only failures where the statement cannot have committed.
    /// A dropped connection may have lost the reply to a committed write.
    Write,
}

impl RetryPolicy {
    pub fn allows(&self, err: &sqlx::Error) -> bool {
        match self {
            RetryPolicy::Read => is_transient(err),
            RetryPolicy::Write => is_uncommitted(err),
        }
    }
}

/// Owned handle on the connection pool plus the retry policy for queries.
///
/// Built once at startup and shared through the application state; cloning is
/// cheap (the pool is reference counted).
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    retries: u32,
    backoff: Duration,
}

impl Database {
    /// Open a bounded pool. Connections are established lazily on first use so
    /// the server can start while the database is still coming up.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut options =
            PgConnectOptions::from_str(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if config.require_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .idle_timeout(Duration::from_secs(30))
            .connect_lazy_with(options);

        info!(
            "Database pool configured (max_connections={}, retries={})",
            config.max_connections, config.query_retries
        );

        Ok(Self::from_pool(pool, config.query_retries, Duration::from_millis(config.retry_backoff_ms)))
    }

    pub fn from_pool(pool: PgPool, retries: u32, backoff: Duration) -> Self {
        Self {
            pool,
            retries: retries.max(1),
            backoff,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a read against the pool, retrying transient failures with linear
    /// backoff (`backoff * attempt`). Non-transient errors return immediately.
    pub async fn with_retry<T, F, Fut>(&self, label: &str, op: F) -> Result<T, DatabaseError>
    where
        F: FnMut(PgPool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        self.run(RetryPolicy::Read, label, op).await
    }

    /// Run a mutation, retrying only when it cannot have been applied.
    pub async fn with_write_retry<T, F, Fut>(&self, label: &str, op: F) -> Result<T, DatabaseError>
    where
        F: FnMut(PgPool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        self.run(RetryPolicy::Write, label, op).await
    }

    async fn run<T, F, Fut>(&self, policy: RetryPolicy, label: &str, mut op: F) -> Result<T, DatabaseError>
    where
        F: FnMut(PgPool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempt = 1;
        loop {
            match op(self.pool.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) if policy.allows(&err) && attempt < self.retries => {
                    warn!(
                        "Database query '{}' failed (attempt {}/{}): {}",
                        label, attempt, self.retries, err
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) if policy.allows(&err) => {
                    return Err(DatabaseError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => return Err(DatabaseError::Sqlx(err)),
            }
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool on shutdown, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Errors worth retrying: connectivity problems and the SQLSTATE classes the
/// server uses for transient conditions.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => true,
        sqlx::Error::Database(db) => match db.code() {
            // 08xxx connection exception, 40001 serialization failure,
            // 40P01 deadlock, 53300 too many connections, 57P01 admin shutdown
            Some(code) => {
                code.starts_with("08")
                    || matches!(code.as_ref(), "40001" | "40P01" | "53300" | "57P01")
            }
            None => false,
        },
        _ => false,
    }
}

/// Failures raised before the statement ran or after the server rolled it
/// back: pool exhaustion, serialization failure, deadlock, and connection
/// refusals at startup.
pub fn is_uncommitted(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("40001" | "40P01" | "53300" | "57P03")
        ),
        _ => false,
    }
}

/// Truncate long string parameters before they reach the log.
pub fn loggable_param(value: &str) -> &str {
    match value.char_indices().nth(50) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
