use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers::{health, notifications, settings};
use crate::middleware::correlation_middleware;
use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let prefix = state.config.api_v1_prefix.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .nest(&prefix, api_routes())
        .layer(middleware::from_fn(correlation_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/notifications/unread/count",
            get(notifications::unread_count),
        )
        .route("/notifications/mark-read", post(notifications::mark_read_bulk))
        .route(
            "/notifications/settings",
            get(settings::get_settings).patch(settings::update_settings),
        )
        .route(
            "/notifications/:id",
            get(notifications::get_notification).delete(notifications::delete_notification),
        )
        .route("/notifications/:id/read", patch(notifications::mark_read))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_origins.trim() == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// GET / - service identity
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": state.config.project_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}
