// handlers/protected/sql.rs - SQL console proxy
//
// Both endpoints forward the caller's bearer token to the SQL service, which
// verifies it with the same shared secret.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::BearerToken;
use crate::services::SqlExecution;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub question: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    #[serde(alias = "sql_query")]
    pub sql_query: Option<String>,
}

/// POST /sql/generate - `{question}` -> `{sql}`
pub async fn generate_post(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let question = body
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Question is required"))?;

    let sql = state.sql.generate(&question, &token).await?;
    Ok(Json(json!({ "sql": sql })))
}

/// POST /sql/execute - `{sqlQuery}` -> `{columns, rows}`
pub async fn execute_post(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<SqlExecution>, ApiError> {
    let Json(body) = payload?;
    let sql_query = body
        .sql_query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("SQL query is required"))?;

    Ok(Json(state.sql.execute(&sql_query, &token).await?))
}
