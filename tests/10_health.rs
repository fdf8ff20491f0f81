mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};

#[tokio::test]
async fn root_reports_service_identity() -> Result<()> {
    let (status, body) = common::send(common::test_app(), common::get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Notifications API");
    assert_eq!(body["status"], "running");
    Ok(())
}

#[tokio::test]
async fn health_reports_degraded_when_database_is_unreachable() -> Result<()> {
    let (status, body) = common::send(common::test_app(), common::get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["api"], "ok");
    assert_eq!(body["checks"]["database"], "error");
    Ok(())
}

#[tokio::test]
async fn trace_id_header_is_generated_when_absent() -> Result<()> {
    let response = tower::ServiceExt::oneshot(common::test_app(), common::get("/")).await?;

    let trace_id = response
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert!(trace_id.is_some_and(|id| !id.is_empty()));
    Ok(())
}

#[tokio::test]
async fn trace_id_header_is_echoed_when_supplied() -> Result<()> {
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("x-trace-id", "trace-abc-123")
        .body(Body::empty())?;

    let response = tower::ServiceExt::oneshot(common::test_app(), request).await?;

    assert_eq!(
        response.headers().get("x-trace-id").and_then(|v| v.to_str().ok()),
        Some("trace-abc-123")
    );
    Ok(())
}
