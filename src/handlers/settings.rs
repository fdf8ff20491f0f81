use axum::extract::State;
use axum::response::Json;

use crate::api::settings::{NotificationSettings, UpdateSettingsRequest};
use crate::auth::AuthUser;
use crate::database::SpArg;
use crate::error::{translate_procedure_error, ApiError};
use crate::state::AppState;

/// GET /notifications/settings - current settings, defaults supplied by the
/// procedure for first-time users
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<NotificationSettings>, ApiError> {
    let rows = state
        .db
        .call_procedure(
            "activity.sp_get_notification_settings",
            &[SpArg::Uuid(user.user_id)],
        )
        .await
        .map_err(translate_procedure_error)?;

    let row = rows
        .first()
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND"))?;

    let settings = NotificationSettings::from_row(row).map_err(translate_procedure_error)?;
    Ok(Json(settings))
}

/// PATCH /notifications/settings - partial update
///
/// Unset fields are bound as NULL so the procedure leaves them unchanged.
/// Ghost mode is premium-gated inside the procedure and surfaces as a 403
/// through the error translator.
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let rows = state
        .db
        .call_procedure(
            "activity.sp_update_notification_settings",
            &[
                SpArg::Uuid(user.user_id),
                SpArg::OptBool(request.email_notifications),
                SpArg::OptBool(request.push_notifications),
                SpArg::OptBool(request.activity_reminders),
                SpArg::OptBool(request.community_updates),
                SpArg::OptBool(request.friend_requests),
                SpArg::OptBool(request.marketing_emails),
                SpArg::OptBool(request.ghost_mode),
                SpArg::OptText(request.language),
                SpArg::OptText(request.timezone),
            ],
        )
        .await
        .map_err(translate_procedure_error)?;

    let row = rows
        .first()
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND"))?;

    let settings = NotificationSettings::from_row(row).map_err(translate_procedure_error)?;

    tracing::info!(
        user_id = %user.user_id,
        ghost_mode = settings.ghost_mode,
        "settings updated"
    );

    Ok(Json(settings))
}
