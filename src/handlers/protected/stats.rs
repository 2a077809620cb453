use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::{DashboardStats, ImageStats};
use crate::error::ApiError;

/// GET /stats - dashboard summary; unavailable sources report zero
pub async fn stats_get(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.stats.dashboard().await)
}

/// GET /stats/images
pub async fn image_stats_get(State(state): State<AppState>) -> Result<Json<ImageStats>, ApiError> {
    Ok(Json(state.stats.image_stats().await?))
}
