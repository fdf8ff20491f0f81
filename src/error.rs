use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// HTTP API error with appropriate status codes and client-safe messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity
    Validation(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-visible detail string.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Validation(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// Semantic error markers raised by the stored procedures, in tie-break
/// order: the first marker contained in the error text wins.
const PROCEDURE_ERROR_MAP: &[(&str, StatusCode)] = &[
    ("NOTIFICATION_NOT_FOUND", StatusCode::NOT_FOUND),
    ("USER_NOT_FOUND", StatusCode::NOT_FOUND),
    ("USER_NOT_FOUND_OR_INACTIVE", StatusCode::NOT_FOUND),
    ("UNAUTHORIZED_ACCESS", StatusCode::FORBIDDEN),
    ("PREMIUM_FEATURE_REQUIRED", StatusCode::FORBIDDEN),
];

/// Map a database error onto the HTTP taxonomy. The procedure layer signals
/// structured error kinds only through text embedded in a raised exception,
/// so this performs substring containment over [`PROCEDURE_ERROR_MAP`] and
/// strips the `"<MARKER>: "` prefix from the returned detail. Anything
/// unrecognized becomes a generic 500 that never leaks the raw message.
pub fn translate_procedure_error(err: sqlx::Error) -> ApiError {
    let message = match &err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    };
    translate_error_message(&message)
}

fn translate_error_message(message: &str) -> ApiError {
    for (marker, status) in PROCEDURE_ERROR_MAP {
        if message.contains(marker) {
            let detail = message
                .split_once(": ")
                .map(|(_, rest)| rest)
                .unwrap_or(message)
                .to_string();

            tracing::warn!(
                marker,
                status = status.as_u16(),
                "stored procedure raised a mapped error"
            );

            return match status.as_u16() {
                404 => ApiError::NotFound(detail),
                403 => ApiError::Forbidden(detail),
                _ => ApiError::Internal(detail),
            };
        }
    }

    tracing::error!(error = %message, "unexpected database error");
    ApiError::internal("Internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_marker_strips_prefix_from_detail() {
        let err = translate_error_message("NOTIFICATION_NOT_FOUND: xyz");
        assert_eq!(err, ApiError::NotFound("xyz".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn marker_without_separator_keeps_full_message() {
        let err = translate_error_message("NOTIFICATION_NOT_FOUND");
        assert_eq!(err, ApiError::NotFound("NOTIFICATION_NOT_FOUND".into()));
    }

    #[test]
    fn only_first_separator_is_stripped() {
        let err = translate_error_message("UNAUTHORIZED_ACCESS: not yours: really");
        assert_eq!(err, ApiError::Forbidden("not yours: really".into()));
    }

    #[test]
    fn premium_marker_maps_to_forbidden() {
        let err = translate_error_message("PREMIUM_FEATURE_REQUIRED: ghost mode requires Premium");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.detail(), "ghost mode requires Premium");
    }

    #[test]
    fn unknown_message_becomes_generic_500() {
        let err = translate_error_message("deadlock detected");
        assert_eq!(err, ApiError::Internal("Internal server error".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn first_marker_in_table_order_wins() {
        // USER_NOT_FOUND_OR_INACTIVE also contains USER_NOT_FOUND; both map
        // to 404, and the earlier table entry is the documented tie-break.
        let err = translate_error_message("USER_NOT_FOUND_OR_INACTIVE: gone");
        assert_eq!(err, ApiError::NotFound("gone".into()));
    }
}
