use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /users/:id/toggle-pro - flip the pro flag, returning the new value
pub async fn toggle_pro(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(user_id) = user_id?;
    let is_pro = state.repo.toggle_pro(user_id).await?;
    info!("User {} pro flag set to {}", user_id, is_pro);
    Ok(Json(json!({ "success": true, "isPro": is_pro })))
}
