use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

/// Per-user notification settings, a direct projection of the procedure's
/// row. The get procedure supplies defaults for first-time users, so this is
/// never absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub user_id: Uuid,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub activity_reminders: bool,
    pub community_updates: bool,
    pub friend_requests: bool,
    pub marketing_emails: bool,
    pub ghost_mode: bool,
    pub language: String,
    pub timezone: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationSettings {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            email_notifications: row.try_get("email_notifications")?,
            push_notifications: row.try_get("push_notifications")?,
            activity_reminders: row.try_get("activity_reminders")?,
            community_updates: row.try_get("community_updates")?,
            friend_requests: row.try_get("friend_requests")?,
            marketing_emails: row.try_get("marketing_emails")?,
            ghost_mode: row.try_get("ghost_mode")?,
            language: row.try_get("language")?,
            timezone: row.try_get("timezone")?,
            // The get procedure does not return this column.
            updated_at: row.try_get("updated_at").ok().flatten(),
        })
    }
}

/// Partial update. Unset fields are passed to the procedure as NULL so it
/// leaves them untouched; ghost mode tier gating happens in the procedure.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateSettingsRequest {
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub activity_reminders: Option<bool>,
    pub community_updates: Option<bool>,
    pub friend_requests: Option<bool>,
    pub marketing_emails: Option<bool>,
    pub ghost_mode: Option<bool>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}
