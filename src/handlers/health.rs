use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET /health - 200 when the database answers the liveness query, else 503.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "health check database probe failed");
            "error"
        }
    };

    let healthy = database == "ok";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "checks": {
                "api": "ok",
                "database": database,
            }
        })),
    )
}
