// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use notifications_api::config::{AppConfig, DatabaseConfig, Environment};
use notifications_api::database::Database;
use notifications_api::routes::app;
use notifications_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_SERVICE_TOKEN: &str = "integration-service-token";

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        project_name: "Notifications API".into(),
        api_v1_prefix: "/api/v1".into(),
        port: 0,
        database: DatabaseConfig {
            // Nothing listens here; pool acquisition fails fast when a
            // handler actually touches the database.
            host: "127.0.0.1".into(),
            port: 1,
            name: "activity_platform".into(),
            user: "api_user".into(),
            password: "changeme".into(),
            pool_min: 1,
            pool_max: 2,
            command_timeout_secs: 2,
        },
        jwt_secret: TEST_JWT_SECRET.into(),
        jwt_algorithm: Algorithm::HS256,
        service_token: TEST_SERVICE_TOKEN.into(),
        log_level: "warn".into(),
        cors_origins: "*".into(),
    }
}

/// Build the full application router around a lazy pool; no connection is
/// attempted until a handler calls a procedure.
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(&config.database_url())
        .expect("lazy pool construction");

    let state = AppState {
        db: Database::from_pool(pool),
        config: Arc::new(config),
    };
    app(state)
}

pub fn bearer_token(claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

pub fn user_token(subscription_level: &str) -> String {
    bearer_token(&serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "subscription_level": subscription_level,
        "exp": chrono::Utc::now().timestamp() + 3600,
    }))
}

/// Run one request through the router and return status plus parsed body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("infallible router call");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}
