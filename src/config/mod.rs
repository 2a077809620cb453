use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub list: ListConfig,
    pub security: SecurityConfig,
    pub media: MediaConfig,
    pub sql_service: SqlServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub require_ssl: bool,
    pub query_retries: u32,
    pub retry_backoff_ms: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub verify_tokens: bool,
    pub cors_origins: Vec<String>,
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub login_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub private_key: String,
    pub root_path: String,
    pub page_limit: u32,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlServiceConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// Presets are picked by `APP_ENV`, then individual variables override
    /// them. `DATABASE_URL` and `JWT_SECRET` have no default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("COCKPIT_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = env::var("DATABASE_URL").ok().or_else(|| env::var("POSTGRES_URL").ok()) {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_REQUIRE_SSL") {
            self.database.require_ssl = v.parse().unwrap_or(self.database.require_ssl);
        }
        if let Ok(v) = env::var("DATABASE_QUERY_RETRIES") {
            self.database.query_retries = v.parse().unwrap_or(self.database.query_retries);
        }
        if let Ok(v) = env::var("DATABASE_RETRY_BACKOFF_MS") {
            self.database.retry_backoff_ms = v.parse().unwrap_or(self.database.retry_backoff_ms);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // List overrides
        if let Ok(v) = env::var("LIST_MAX_PAGE_SIZE") {
            self.list.max_page_size = v.parse().unwrap_or(self.list.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_VERIFY_TOKENS") {
            self.security.verify_tokens = v.parse().unwrap_or(self.security.verify_tokens);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE_NAME") {
            self.security.session_cookie_name = v;
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("SECURITY_LOGIN_PATH") {
            self.security.login_path = v;
        }

        // Media overrides
        if let Ok(v) = env::var("MEDIA_API_URL") {
            self.media.api_url = v;
        }
        if let Ok(v) = env::var("IMAGEKIT_PRIVATE_KEY") {
            self.media.private_key = v;
        }
        if let Ok(v) = env::var("MEDIA_ROOT_PATH") {
            self.media.root_path = v;
        }
        if let Ok(v) = env::var("MEDIA_PAGE_LIMIT") {
            self.media.page_limit = v.parse().unwrap_or(self.media.page_limit);
        }
        if let Ok(v) = env::var("MEDIA_MAX_RETRIES") {
            self.media.max_retries = v.parse().unwrap_or(self.media.max_retries);
        }
        if let Ok(v) = env::var("MEDIA_RETRY_BACKOFF_MS") {
            self.media.retry_backoff_ms = v.parse().unwrap_or(self.media.retry_backoff_ms);
        }
        if let Ok(v) = env::var("MEDIA_MAX_CONCURRENCY") {
            self.media.max_concurrency = v.parse().unwrap_or(self.media.max_concurrency);
        }

        // SQL service overrides
        if let Ok(v) = env::var("SQL_SERVICE_URL") {
            self.sql_service.base_url = v;
        }
        if let Ok(v) = env::var("SQL_SERVICE_MAX_RETRIES") {
            self.sql_service.max_retries = v.parse().unwrap_or(self.sql_service.max_retries);
        }
        if let Ok(v) = env::var("SQL_SERVICE_RETRY_DELAY_MS") {
            self.sql_service.retry_delay_ms = v.parse().unwrap_or(self.sql_service.retry_delay_ms);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 5,
                require_ssl: false,
                query_retries: 3,
                retry_backoff_ms: 1000,
                enable_query_logging: true,
            },
            list: ListConfig { max_page_size: 1000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                verify_tokens: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
                session_cookie_name: "auth_token".to_string(),
                cookie_secure: false,
                login_path: "/login".to_string(),
            },
            media: MediaConfig {
                api_url: "https://api.imagekit.io/v1".to_string(),
                private_key: String::new(),
                root_path: "/wines".to_string(),
                page_limit: 1000,
                max_retries: 5,
                retry_backoff_ms: 500,
                max_concurrency: 4,
            },
            sql_service: SqlServiceConfig {
                base_url: "https://fastapi.mywine.info".to_string(),
                max_retries: 3,
                retry_delay_ms: 1000,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 10;
        config.database.require_ssl = true;
        config.list.max_page_size = 500;
        config.security.cors_origins = vec!["https://mywine-cockpit.vercel.app".to_string()];
        config.security.cookie_secure = true;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 10;
        config.database.require_ssl = true;
        config.database.enable_query_logging = false;
        config.list.max_page_size = 100;
        config.security.cors_origins = vec![
            "https://cockpit.mywine.info".to_string(),
            "https://mywine-cockpit.vercel.app".to_string(),
        ];
        config.security.cookie_secure = true;
        config.media.max_concurrency = 2;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.list.max_page_size, 1000);
        assert!(config.security.verify_tokens);
        assert_eq!(config.security.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.database.query_retries, 3);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.list.max_page_size, 100);
        assert!(config.security.cookie_secure);
        assert!(config.security.cors_origins.contains(&"https://cockpit.mywine.info".to_string()));
        assert!(!config.security.cors_origins.contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn validate_requires_secrets() {
        let mut config = AppConfig::development();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("DATABASE_URL"))));

        config.database.url = "postgres://localhost/wine".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("JWT_SECRET"))));

        config.security.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }
}
