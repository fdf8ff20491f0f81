mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use uuid::Uuid;

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() -> Result<()> {
    let (status, body) =
        common::send(common::test_app(), common::get("/api/v1/notifications")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() -> Result<()> {
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/notifications")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())?;

    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["detail"],
        "Authorization header must use Bearer token format"
    );
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let (status, body) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications", "not-a-jwt"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid authentication credentials");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let token = common::bearer_token(&serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "exp": chrono::Utc::now().timestamp() - 3600,
    }));

    let (status, _) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_without_subject_is_unauthorized() -> Result<()> {
    let token = common::bearer_token(&serde_json::json!({
        "exp": chrono::Utc::now().timestamp() + 3600,
    }));

    let (status, body) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token payload");
    Ok(())
}

#[tokio::test]
async fn token_with_non_uuid_subject_is_unauthorized() -> Result<()> {
    let token = common::bearer_token(&serde_json::json!({
        "sub": "user-42",
        "exp": chrono::Utc::now().timestamp() + 3600,
    }));

    let (status, _) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn create_without_service_token_is_forbidden() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/notifications")
        .header("content-type", "application/json")
        .body(Body::from("{}"))?;

    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid service token");
    Ok(())
}

#[tokio::test]
async fn create_with_wrong_service_token_is_forbidden() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/notifications")
        .header("x-service-token", "wrong-secret")
        .header("content-type", "application/json")
        .body(Body::from("{}"))?;

    let (status, _) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
