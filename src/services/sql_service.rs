use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::SqlServiceConfig;

#[derive(Error, Debug)]
pub enum SqlServiceError {
    #[error("SQL service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("SQL service refused the credentials: {0}")]
    Unauthorized(String),

    #[error("SQL service unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },

    #[error("Invalid response from SQL service: {0}")]
    InvalidResponse(String),

    #[error("Invalid SQL service URL: {0}")]
    InvalidUrl(String),
}

/// Result of a console query: column names from the first row, then rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlExecution {
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
}

/// Client for the natural-language SQL service. The caller's bearer token
/// is forwarded unchanged.
#[derive(Clone)]
pub struct SqlConsoleClient {
    http: reqwest::Client,
    base_url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl SqlConsoleClient {
    pub fn new(config: &SqlServiceConfig) -> Result<Self, SqlServiceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SqlServiceError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SqlServiceError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Ask the service to turn `question` into SQL. The statement is trimmed
    /// and always ends with `;`.
    pub async fn generate(&self, question: &str, token: &str) -> Result<String, SqlServiceError> {
        let url = self.endpoint("generate-sql", "question", question)?;
        let data = self.post_with_retry(url, token, "Failed to generate SQL query").await?;

        let sql = data
            .get("generated_sql")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim();
        Ok(if sql.ends_with(';') {
            sql.to_string()
        } else {
            format!("{};", sql)
        })
    }

    pub async fn execute(&self, sql_query: &str, token: &str) -> Result<SqlExecution, SqlServiceError> {
        let url = self.endpoint("execute-sql", "sql_query", sql_query)?;
        let data = self.post_with_retry(url, token, "Failed to execute SQL query").await?;

        let rows = match data.get("result") {
            Some(Value::Array(rows)) => rows.clone(),
            _ => return Err(SqlServiceError::InvalidResponse("missing result array".to_string())),
        };
        Ok(SqlExecution {
            columns: result_columns(&rows),
            rows,
        })
    }

    fn endpoint(&self, path: &str, param: &str, value: &str) -> Result<Url, SqlServiceError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SqlServiceError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair(param, value);
        Ok(url)
    }

    /// POST with linear backoff on 5xx and transport failures. 4xx responses
    /// return immediately.
    async fn post_with_retry(&self, url: Url, token: &str, fallback: &str) -> Result<Value, SqlServiceError> {
        let mut reason = String::new();

        for attempt in 1..=self.max_retries {
            debug!("SQL service request to {} (attempt {})", url.path(), attempt);
            match self.http.post(url.clone()).bearer_auth(token).send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let data: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));

                    if status.is_success() {
                        return Ok(data);
                    }
                    if status.is_client_error() {
                        let message = error_detail(&data, fallback);
                        return Err(match status.as_u16() {
                            401 | 403 => SqlServiceError::Unauthorized(message),
                            code => SqlServiceError::Rejected { status: code, message },
                        });
                    }
                    reason = format!("server error {}", status.as_u16());
                }
                Err(e) => reason = e.to_string(),
            }

            warn!("SQL service attempt {} failed: {}", attempt, reason);
            if attempt < self.max_retries {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
        }

        Err(SqlServiceError::Unavailable {
            attempts: self.max_retries,
            reason,
        })
    }
}

/// Column names in the order the service returned them in the first row.
fn result_columns(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Human readable message from a FastAPI error body.
pub fn error_detail(data: &Value, fallback: &str) -> String {
    // Validation errors may arrive as a JSON-encoded string.
    if let Value::String(s) = data {
        if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(s) {
            return error_detail(&parsed, fallback);
        }
    }

    let validation = match data {
        Value::Array(errors) => Some(errors),
        Value::Object(map) => map.get("detail").and_then(Value::as_array),
        _ => None,
    };
    if let Some(errors) = validation {
        return errors
            .iter()
            .map(|err| {
                let msg = err.get("msg").and_then(Value::as_str).unwrap_or("invalid value");
                let loc = err
                    .get("loc")
                    .and_then(Value::as_array)
                    .map(|parts| {
                        parts
                            .iter()
                            .map(|p| match p {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_default();
                format!("{} at {}", msg, loc)
            })
            .collect::<Vec<_>>()
            .join("; ");
    }

    match data.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Object(detail)) => Value::Object(detail.clone()).to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_validation_arrays() {
        let data = json!([
            { "msg": "field required", "loc": ["query", "question"] },
            { "msg": "too long", "loc": ["query", "sql_query", 0] }
        ]);
        assert_eq!(
            error_detail(&data, "x"),
            "field required at query.question; too long at query.sql_query.0"
        );
    }

    #[test]
    fn formats_nested_validation_detail() {
        let data = json!({ "detail": [{ "msg": "bad", "loc": ["body"] }] });
        assert_eq!(error_detail(&data, "x"), "bad at body");
    }

    #[test]
    fn formats_string_encoded_arrays() {
        let data = Value::String(r#"[{"msg":"bad","loc":["q"]}]"#.to_string());
        assert_eq!(error_detail(&data, "x"), "bad at q");
    }

    #[test]
    fn uses_string_and_object_detail() {
        assert_eq!(error_detail(&json!({ "detail": "Only SELECT allowed" }), "x"), "Only SELECT allowed");
        assert_eq!(error_detail(&json!({ "detail": { "code": 7 } }), "x"), r#"{"code":7}"#);
        assert_eq!(error_detail(&json!({ "other": 1 }), "fallback"), "fallback");
        assert_eq!(error_detail(&Value::String("<html>".into()), "fallback"), "fallback");
    }

    #[test]
    fn columns_follow_the_response_order() {
        let rows: Vec<Value> =
            serde_json::from_str(r#"[{"name":"Merlot","id":1,"country":"FR"}]"#).unwrap();
        assert_eq!(result_columns(&rows), vec!["name", "id", "country"]);
        assert!(result_columns(&[]).is_empty());
    }

    #[test]
    fn endpoint_encodes_the_query() {
        let client = SqlConsoleClient::new(&SqlServiceConfig {
            base_url: "https://sql.example.com".to_string(),
            max_retries: 3,
            retry_delay_ms: 1,
        })
        .unwrap();
        let url = client.endpoint("execute-sql", "sql_query", "SELECT 1; -- a&b").unwrap();
        assert_eq!(url.path(), "/execute-sql");
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("sql_query".to_string(), "SELECT 1; -- a&b".to_string())]);
    }
}
