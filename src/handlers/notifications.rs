use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use sqlx::Row;
use uuid::Uuid;

use crate::api::notifications::{
    CreateNotificationRequest, CreateNotificationResponse, DeleteResponse, MarkReadBulkRequest,
    MarkReadResponse, NotificationListResponse, NotificationRecord, NotificationStatus,
    NotificationType, PaginationMeta, ReadReceipt, UnreadByType, UnreadCountResponse,
};
use crate::auth::{AuthUser, ServiceAuth};
use crate::database::SpArg;
use crate::error::{translate_procedure_error, ApiError};
use crate::state::AppState;

const DEFAULT_LIMIT: i32 = 20;
const MAX_LIMIT: i32 = 100;
const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<NotificationStatus>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    DEFAULT_LIMIT
}

/// GET /notifications - paginated list with optional status/type filters
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    if !(1..=MAX_LIMIT).contains(&query.limit) {
        return Err(ApiError::validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if query.offset < 0 {
        return Err(ApiError::validation("offset must be non-negative"));
    }

    let include_premium = user.include_premium();

    let rows = state
        .db
        .call_procedure(
            "activity.sp_get_user_notifications",
            &[
                SpArg::Uuid(user.user_id),
                SpArg::OptText(query.status.map(|s| s.as_str().to_string())),
                SpArg::OptText(query.notification_type.map(|t| t.as_str().to_string())),
                SpArg::Int(query.limit),
                SpArg::Int(query.offset),
                SpArg::Bool(include_premium),
            ],
        )
        .await
        .map_err(translate_procedure_error)?;

    // Total count rides along on every row as a window-function column.
    let total = match rows.first() {
        Some(row) => row
            .try_get::<i64, _>("total_count")
            .map_err(translate_procedure_error)?,
        None => 0,
    };

    let notifications = rows
        .iter()
        .map(NotificationRecord::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(translate_procedure_error)?;

    tracing::info!(
        user_id = %user.user_id,
        count = notifications.len(),
        total,
        "notifications retrieved"
    );

    Ok(Json(NotificationListResponse {
        notifications,
        pagination: PaginationMeta::new(total, i64::from(query.limit), i64::from(query.offset)),
    }))
}

/// GET /notifications/unread/count - unread totals broken down by type
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let include_premium = user.include_premium();

    let rows = state
        .db
        .call_procedure(
            "activity.sp_get_unread_count",
            &[SpArg::Uuid(user.user_id), SpArg::Bool(include_premium)],
        )
        .await
        .map_err(translate_procedure_error)?;

    let (total_unread, by_type) = match rows.first() {
        Some(row) => (
            row.try_get::<i64, _>("total_unread")
                .map_err(translate_procedure_error)?,
            UnreadByType::from_row(row).map_err(translate_procedure_error)?,
        ),
        None => (0, UnreadByType::default()),
    };

    Ok(Json(UnreadCountResponse::new(
        total_unread,
        by_type,
        include_premium,
    )))
}

/// GET /notifications/:id - single notification
pub async fn get_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<NotificationRecord>, ApiError> {
    let rows = state
        .db
        .call_procedure(
            "activity.sp_get_notification_by_id",
            &[SpArg::Uuid(user.user_id), SpArg::Uuid(notification_id)],
        )
        .await
        .map_err(translate_procedure_error)?;

    let row = rows
        .first()
        .ok_or_else(|| ApiError::not_found("NOTIFICATION_NOT_FOUND"))?;

    let record = NotificationRecord::from_row(row).map_err(translate_procedure_error)?;
    Ok(Json(record))
}

/// PATCH /notifications/:id/read - mark one notification as read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ReadReceipt>, ApiError> {
    let rows = state
        .db
        .call_procedure(
            "activity.sp_mark_notification_as_read",
            &[SpArg::Uuid(user.user_id), SpArg::Uuid(notification_id)],
        )
        .await
        .map_err(translate_procedure_error)?;

    let row = rows
        .first()
        .ok_or_else(|| ApiError::not_found("NOTIFICATION_NOT_FOUND"))?;

    let receipt = ReadReceipt::from_row(row).map_err(translate_procedure_error)?;

    tracing::info!(
        notification_id = %notification_id,
        user_id = %user.user_id,
        "notification marked read"
    );

    Ok(Json(receipt))
}

/// POST /notifications/mark-read - bulk mark-as-read
///
/// Accepts explicit ids, `mark_all`, or `mark_all` plus a type filter. A type
/// filter without `mark_all` is rejected before any procedure call; this is
/// the one validation rule that lives above the database.
pub async fn mark_read_bulk(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<MarkReadBulkRequest>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    if request.notification_type.is_some() && !request.mark_all.unwrap_or(false) {
        return Err(ApiError::validation(
            "notification_type requires mark_all=true",
        ));
    }

    let rows = state
        .db
        .call_procedure(
            "activity.sp_mark_notifications_as_read_bulk",
            &[
                SpArg::Uuid(user.user_id),
                SpArg::OptUuidList(request.notification_ids),
                SpArg::OptText(request.notification_type.map(|t| t.as_str().to_string())),
            ],
        )
        .await
        .map_err(translate_procedure_error)?;

    let updated_count = match rows.first() {
        Some(row) => row
            .try_get::<i64, _>("updated_count")
            .map_err(translate_procedure_error)?,
        None => 0,
    };

    tracing::info!(
        user_id = %user.user_id,
        count = updated_count,
        "notifications marked read in bulk"
    );

    Ok(Json(MarkReadResponse::new(updated_count)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub permanent: bool,
}

/// DELETE /notifications/:id - archive, or hard-delete with ?permanent=true
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let rows = state
        .db
        .call_procedure(
            "activity.sp_delete_notification",
            &[
                SpArg::Uuid(user.user_id),
                SpArg::Uuid(notification_id),
                SpArg::Bool(query.permanent),
            ],
        )
        .await
        .map_err(translate_procedure_error)?;

    let row = rows
        .first()
        .ok_or_else(|| ApiError::not_found("NOTIFICATION_NOT_FOUND"))?;

    let response = DeleteResponse::from_row(row).map_err(translate_procedure_error)?;

    tracing::info!(
        notification_id = %notification_id,
        permanent = query.permanent,
        "notification deleted"
    );

    Ok(Json(response))
}

/// POST /notifications - create a notification (service-to-service only)
///
/// The procedure may decline to insert when the recipient opted out of the
/// type; that surfaces as a "skipped" outcome, not an error.
pub async fn create_notification(
    State(state): State<AppState>,
    _service: ServiceAuth,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<CreateNotificationResponse>), ApiError> {
    if request.title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }

    let rows = state
        .db
        .call_procedure(
            "activity.sp_create_notification",
            &[
                SpArg::Uuid(request.user_id),
                SpArg::OptUuid(request.actor_user_id),
                SpArg::Text(request.notification_type.as_str().to_string()),
                SpArg::Text(request.target_type.as_str().to_string()),
                SpArg::Uuid(request.target_id),
                SpArg::Text(request.title.clone()),
                SpArg::OptText(request.message.clone()),
                SpArg::OptJson(request.payload.clone()),
            ],
        )
        .await
        .map_err(translate_procedure_error)?;

    let result = match rows.first() {
        Some(row) => Some((
            row.try_get::<Option<Uuid>, _>("notification_id")
                .map_err(translate_procedure_error)?,
            row.try_get("created_at").ok().flatten(),
        )),
        None => None,
    };

    let response = CreateNotificationResponse::from_procedure_result(result);

    match response.notification_id {
        Some(id) => tracing::info!(
            notification_id = %id,
            user_id = %request.user_id,
            notification_type = request.notification_type.as_str(),
            "notification created"
        ),
        None => tracing::info!(
            user_id = %request.user_id,
            notification_type = request.notification_type.as_str(),
            "notification skipped"
        ),
    }

    Ok((StatusCode::CREATED, Json(response)))
}
