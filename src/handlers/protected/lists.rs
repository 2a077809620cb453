use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::list::{ListParams, ListResponse};

/// POST /lists/:resource - one page of a whitelisted resource
///
/// Body: `{page, pageSize, sortBy?, sortDirection?, filters?: [{column, value}]}`.
pub async fn list_post(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    payload: Result<Json<ListParams>, JsonRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Json(params) = payload?;
    let response = state.lists.list(&resource, params).await?;
    Ok(Json(response))
}
