use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::AuthUser;

/// GET /dashboard - data for the server-rendered dashboard page
///
/// Sits behind the session cookie gate, so an anonymous visitor is
/// redirected to the login page rather than seeing a 401.
pub async fn dashboard(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Json<Value> {
    let stats = state.stats.dashboard().await;
    Json(json!({
        "user": { "email": user.email, "role": user.role },
        "stats": stats
    }))
}
