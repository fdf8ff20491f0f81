use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

/// Closed set of notification types. `profile_view` and `new_favorite` are
/// premium-exclusive; the procedures filter them for free-tier callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ActivityInvite,
    ActivityReminder,
    ActivityUpdate,
    CommunityInvite,
    NewMember,
    NewPost,
    Comment,
    Reaction,
    Mention,
    ProfileView,
    NewFavorite,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::ActivityInvite => "activity_invite",
            NotificationType::ActivityReminder => "activity_reminder",
            NotificationType::ActivityUpdate => "activity_update",
            NotificationType::CommunityInvite => "community_invite",
            NotificationType::NewMember => "new_member",
            NotificationType::NewPost => "new_post",
            NotificationType::Comment => "comment",
            NotificationType::Reaction => "reaction",
            NotificationType::Mention => "mention",
            NotificationType::ProfileView => "profile_view",
            NotificationType::NewFavorite => "new_favorite",
            NotificationType::System => "system",
        }
    }

    fn from_db(value: &str) -> Result<Self, sqlx::Error> {
        match value {
            "activity_invite" => Ok(NotificationType::ActivityInvite),
            "activity_reminder" => Ok(NotificationType::ActivityReminder),
            "activity_update" => Ok(NotificationType::ActivityUpdate),
            "community_invite" => Ok(NotificationType::CommunityInvite),
            "new_member" => Ok(NotificationType::NewMember),
            "new_post" => Ok(NotificationType::NewPost),
            "comment" => Ok(NotificationType::Comment),
            "reaction" => Ok(NotificationType::Reaction),
            "mention" => Ok(NotificationType::Mention),
            "profile_view" => Ok(NotificationType::ProfileView),
            "new_favorite" => Ok(NotificationType::NewFavorite),
            "system" => Ok(NotificationType::System),
            other => Err(decode_error(format!("unknown notification type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::Read => "read",
            NotificationStatus::Archived => "archived",
        }
    }

    fn from_db(value: &str) -> Result<Self, sqlx::Error> {
        match value {
            "unread" => Ok(NotificationStatus::Unread),
            "read" => Ok(NotificationStatus::Read),
            "archived" => Ok(NotificationStatus::Archived),
            other => Err(decode_error(format!("unknown notification status: {other}"))),
        }
    }
}

fn decode_error(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}

/// The user whose action triggered the notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorInfo {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub main_photo_url: Option<String>,
}

/// A notification exactly as the procedure returned it. Never mutated
/// locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub actor: Option<ActorInfo>,
    pub notification_type: NotificationType,
    pub target_type: String,
    pub target_id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub payload: Option<Value>,
}

impl NotificationRecord {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        // Actor columns are only populated for actor-triggered types; the
        // list procedure also omits actor_last_name entirely.
        let actor = match row.try_get::<Option<Uuid>, _>("actor_user_id")? {
            Some(actor_user_id) => Some(ActorInfo {
                user_id: actor_user_id,
                username: row.try_get("actor_username")?,
                first_name: row.try_get("actor_first_name")?,
                last_name: row.try_get("actor_last_name").ok().flatten(),
                main_photo_url: row.try_get("actor_main_photo_url")?,
            }),
            None => None,
        };

        Ok(Self {
            notification_id: row.try_get("notification_id")?,
            user_id: row.try_get("user_id")?,
            actor,
            notification_type: NotificationType::from_db(
                row.try_get::<String, _>("notification_type")?.as_str(),
            )?,
            target_type: row.try_get("target_type")?,
            target_id: row.try_get("target_id")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            status: NotificationStatus::from_db(row.try_get::<String, _>("status")?.as_str())?,
            created_at: row.try_get("created_at")?,
            read_at: row.try_get("read_at")?,
            payload: row.try_get("payload")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationRecord>,
    pub pagination: PaginationMeta,
}

/// Fixed 12-key unread breakdown, one counter per notification type.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UnreadByType {
    pub activity_invite: i64,
    pub activity_reminder: i64,
    pub activity_update: i64,
    pub community_invite: i64,
    pub new_member: i64,
    pub new_post: i64,
    pub comment: i64,
    pub reaction: i64,
    pub mention: i64,
    pub profile_view: i64,
    pub new_favorite: i64,
    pub system: i64,
}

impl UnreadByType {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            activity_invite: row.try_get("activity_invite_count")?,
            activity_reminder: row.try_get("activity_reminder_count")?,
            activity_update: row.try_get("activity_update_count")?,
            community_invite: row.try_get("community_invite_count")?,
            new_member: row.try_get("new_member_count")?,
            new_post: row.try_get("new_post_count")?,
            comment: row.try_get("comment_count")?,
            reaction: row.try_get("reaction_count")?,
            mention: row.try_get("mention_count")?,
            profile_view: row.try_get("profile_view_count")?,
            new_favorite: row.try_get("new_favorite_count")?,
            system: row.try_get("system_count")?,
        })
    }
}

pub const PREMIUM_EXCLUSION_NOTE: &str =
    "Premium-exclusive notification types (profile_view, new_favorite) are not included";

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub total_unread: i64,
    pub by_type: UnreadByType,
    pub note: Option<String>,
}

impl UnreadCountResponse {
    pub fn new(total_unread: i64, by_type: UnreadByType, include_premium: bool) -> Self {
        let note = if include_premium {
            None
        } else {
            Some(PREMIUM_EXCLUSION_NOTE.to_string())
        };
        Self {
            total_unread,
            by_type,
            note,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MarkReadBulkRequest {
    pub notification_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub mark_all: Option<bool>,
    pub notification_type: Option<NotificationType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub updated_count: i64,
    pub message: String,
}

impl MarkReadResponse {
    pub fn new(updated_count: i64) -> Self {
        Self {
            message: format!("{updated_count} notifications marked as read"),
            updated_count,
        }
    }
}

/// Receipt for a single mark-as-read call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub notification_id: Uuid,
    pub status: NotificationStatus,
    pub read_at: Option<DateTime<Utc>>,
}

impl ReadReceipt {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            notification_id: row.try_get("notification_id")?,
            status: NotificationStatus::from_db(row.try_get::<String, _>("status")?.as_str())?,
            read_at: row.try_get("read_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            success: row.try_get("success")?,
            message: row.try_get("message")?,
        })
    }
}

/// Target kinds a notification may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Activity,
    Post,
    Comment,
    User,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Activity => "activity",
            TargetType::Post => "post",
            TargetType::Comment => "comment",
            TargetType::User => "user",
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateNotificationRequest {
    pub user_id: Uuid,
    pub actor_user_id: Option<Uuid>,
    pub notification_type: NotificationType,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationStatus {
    Created,
    Skipped,
}

const SKIP_REASON: &str = "User has disabled this notification type";

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateNotificationResponse {
    pub notification_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: CreationStatus,
    pub reason: Option<String>,
}

impl CreateNotificationResponse {
    /// Map the procedure's outcome: a row with a non-null id means the
    /// notification was inserted; no row (or a null id) means the procedure
    /// honored a user-level opt-out and the caller must not treat that as an
    /// error.
    pub fn from_procedure_result(
        result: Option<(Option<Uuid>, Option<DateTime<Utc>>)>,
    ) -> Self {
        match result {
            Some((Some(notification_id), created_at)) => Self {
                notification_id: Some(notification_id),
                created_at,
                status: CreationStatus::Created,
                reason: None,
            },
            _ => Self {
                notification_id: None,
                created_at: None,
                status: CreationStatus::Skipped,
                reason: Some(SKIP_REASON.to_string()),
            },
        }
    }
}
