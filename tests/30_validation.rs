// Request-combination rules that are enforced above the database. Each case
// must be rejected before any connection is acquired, so these run against
// an unreachable pool.
mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use uuid::Uuid;

#[tokio::test]
async fn list_rejects_limit_below_range() -> Result<()> {
    let token = common::user_token("free");
    let (status, body) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications?limit=0", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "limit must be between 1 and 100");
    Ok(())
}

#[tokio::test]
async fn list_rejects_limit_above_range() -> Result<()> {
    let token = common::user_token("premium");
    let (status, _) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications?limit=101", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn list_rejects_negative_offset() -> Result<()> {
    let token = common::user_token("club");
    let (status, body) = common::send(
        common::test_app(),
        common::get_authed("/api/v1/notifications?offset=-1", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "offset must be non-negative");
    Ok(())
}

#[tokio::test]
async fn bulk_mark_read_rejects_type_without_mark_all() -> Result<()> {
    let token = common::user_token("free");
    let (status, body) = common::send(
        common::test_app(),
        common::post_json(
            "/api/v1/notifications/mark-read",
            &token,
            &serde_json::json!({ "notification_type": "comment" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "notification_type requires mark_all=true");
    Ok(())
}

#[tokio::test]
async fn bulk_mark_read_rejects_type_with_mark_all_false() -> Result<()> {
    let token = common::user_token("free");
    let (status, _) = common::send(
        common::test_app(),
        common::post_json(
            "/api/v1/notifications/mark-read",
            &token,
            &serde_json::json!({
                "notification_ids": [Uuid::new_v4().to_string()],
                "mark_all": false,
                "notification_type": "reaction",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn create_rejects_overlong_title() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/notifications")
        .header("x-service-token", common::TEST_SERVICE_TOKEN)
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "user_id": Uuid::new_v4().to_string(),
                "notification_type": "comment",
                "target_type": "post",
                "target_id": Uuid::new_v4().to_string(),
                "title": "x".repeat(256),
            })
            .to_string(),
        ))?;

    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "title must be at most 255 characters");
    Ok(())
}

#[tokio::test]
async fn create_rejects_unknown_target_type() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/notifications")
        .header("x-service-token", common::TEST_SERVICE_TOKEN)
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "user_id": Uuid::new_v4().to_string(),
                "notification_type": "comment",
                "target_type": "garden",
                "target_id": Uuid::new_v4().to_string(),
                "title": "hello",
            })
            .to_string(),
        ))?;

    let (status, _) = common::send(common::test_app(), request).await;

    // Body deserialization failure from the closed target_type enum.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}
