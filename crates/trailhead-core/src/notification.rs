//! Notification records and the per-user feed.
//!
//! Notifications are emitted by the social operations (follows, follow
//! requests, stars). The accept path mutates the original request
//! notification in place instead of deleting it, which keeps an audit trail
//! of how the relationship came about.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::storage::Database;

/// What happened, from the recipient's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone followed a public profile
    Follow,
    /// Someone requested to follow a private profile
    RequestFollow,
    /// An inbound request was accepted (rewritten from RequestFollow)
    RequestAccepted,
    /// An outbound request was accepted
    FollowAccepted,
    /// Someone starred a path
    Star,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Follow => "follow",
            NotificationKind::RequestFollow => "request_follow",
            NotificationKind::RequestAccepted => "request_accepted",
            NotificationKind::FollowAccepted => "follow_accepted",
            NotificationKind::Star => "star",
        }
    }

    pub fn parse(s: &str) -> NotificationKind {
        match s {
            "request_follow" => NotificationKind::RequestFollow,
            "request_accepted" => NotificationKind::RequestAccepted,
            "follow_accepted" => NotificationKind::FollowAccepted,
            "star" => NotificationKind::Star,
            _ => NotificationKind::Follow,
        }
    }
}

/// A single feed entry for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Recipient
    pub user_id: String,
    pub kind: NotificationKind,
    /// User who triggered the notification
    pub actor_id: Option<String>,
    /// Path involved, for star notifications
    pub path_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification addressed to `user_id`.
    pub fn new(user_id: &str, kind: NotificationKind, actor_id: Option<&str>, path_id: Option<&str>) -> Self {
        Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            actor_id: actor_id.map(str::to_string),
            path_id: path_id.map(str::to_string),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

/// List a user's notifications, newest first.
pub fn list_feed(db: &Database, user_id: &str) -> Result<Vec<Notification>> {
    Ok(db.list_notifications(user_id)?)
}

/// Mark one notification read. Recipient-checked.
pub fn mark_read(db: &Database, user_id: &str, notification_id: &str) -> Result<()> {
    let notification = db
        .get_notification(notification_id)?
        .ok_or_else(|| CoreError::NotFound {
            entity: "notification",
            id: notification_id.to_string(),
        })?;
    if notification.user_id != user_id {
        return Err(CoreError::Forbidden(
            "notification belongs to another user".to_string(),
        ));
    }
    db.mark_notification_read(notification_id)?;
    Ok(())
}

/// Mark every notification for the user as read.
pub fn mark_all_read(db: &Database, user_id: &str) -> Result<()> {
    db.mark_all_notifications_read(user_id)?;
    Ok(())
}

/// Count unread notifications.
pub fn unread_count(db: &Database, user_id: &str) -> Result<u32> {
    Ok(db.unread_notification_count(user_id)?)
}
