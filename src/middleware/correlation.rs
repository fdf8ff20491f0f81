use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Per-request correlation id, stored as a request extension so handlers can
/// read it explicitly instead of through ambient state.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Take the caller-supplied `X-Trace-ID` or generate one, echo it on the
/// response, and carry it on a tracing span so all logs for the request
/// correlate. The id has no ordering semantics.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(TraceId(trace_id.clone()));

    let span = tracing::info_span!("request", correlation_id = %trace_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }

    response
}
