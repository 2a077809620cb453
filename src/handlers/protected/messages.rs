use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

/// DELETE /messages/:id
pub async fn message_delete(
    State(state): State<AppState>,
    message_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(message_id) = message_id?;
    state.repo.delete_message(message_id).await?;
    info!("Deleted contact message {}", message_id);
    Ok(Json(json!({ "success": true })))
}
