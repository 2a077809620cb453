use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::WineDetail;
use crate::error::ApiError;

/// GET /wines/:id
pub async fn wine_get(
    State(state): State<AppState>,
    wine_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<WineDetail>, ApiError> {
    let Path(wine_id) = wine_id?;
    Ok(Json(state.repo.wine_detail(wine_id).await?))
}

/// GET /wines/:id/photos - newest first
pub async fn photos_get(
    State(state): State<AppState>,
    wine_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(wine_id) = wine_id?;
    let photos = state.stats.photos(wine_id).await?;
    Ok(Json(json!({ "photos": photos })))
}
