use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Wine Cockpit API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Admin backend for the wine catalog",
            "endpoints": {
                "health": "/health (public)",
                "auth": "/login, /logout (public)",
                "lists": "/lists/:resource (protected)",
                "users": "/users/:id/toggle-pro (protected)",
                "messages": "/messages/:id (protected)",
                "wines": "/wines/:id, /wines/:id/photos (protected)",
                "stats": "/stats, /stats/images (protected)",
                "sql": "/sql/generate, /sql/execute (protected)",
                "dashboard": "/dashboard (session cookie)"
            }
        }
    }))
}

/// GET /health - database reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
