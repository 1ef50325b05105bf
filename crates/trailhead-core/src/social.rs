//! Follow relationships, follow requests, and path stars.
//!
//! A (follower, following) pair has at most one row, which is either a
//! pending request (target profile is private) or an accepted follow. The
//! same toggle operation creates the relation or tears it down, whichever
//! state it is in -- unfollow and withdraw-request are one action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, CoreError, Result};
use crate::notification::{Notification, NotificationKind};
use crate::storage::Database;

/// Directed follow relation. Pending until accepted when the target is private.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: String,
    pub following_id: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Star on a path. Existence is the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathStar {
    pub user_id: String,
    pub path_id: String,
    pub created_at: DateTime<Utc>,
}

/// Follow, unfollow, or withdraw a request -- one toggle for all three.
///
/// With no existing relation: creates one, accepted immediately for a
/// public target or pending for a private one, and notifies the target.
/// With an existing relation (either state): deletes it.
///
/// Returns `true` when the actor is now following/requesting, `false` after
/// a teardown.
///
/// # Errors
/// Self-follow is a conflict; an unknown target is not-found.
pub fn toggle_follow(db: &Database, actor_id: &str, target_id: &str) -> Result<bool> {
    if actor_id == target_id {
        return Err(ConflictError::SelfFollow.into());
    }
    let target = db.get_user(target_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "user",
        id: target_id.to_string(),
    })?;

    let tx = db.conn().unchecked_transaction()?;

    let now_following = if db.get_follow(actor_id, target_id)?.is_some() {
        db.delete_follow(actor_id, target_id)?;
        false
    } else {
        let follow = Follow {
            follower_id: actor_id.to_string(),
            following_id: target_id.to_string(),
            is_accepted: !target.is_private,
            created_at: Utc::now(),
        };
        db.insert_follow(&follow)?;

        let kind = if follow.is_accepted {
            NotificationKind::Follow
        } else {
            NotificationKind::RequestFollow
        };
        db.insert_notification(&Notification::new(target_id, kind, Some(actor_id), None))?;
        true
    };

    tx.commit()?;
    Ok(now_following)
}

/// Accept a pending follow request addressed to `target_id`.
///
/// The relation flips to accepted, the follower gets a FollowAccepted
/// notification, and the original request notification is rewritten in
/// place to RequestAccepted and marked read rather than deleted.
///
/// # Errors
/// Not-found if no relation exists; conflict if it was already accepted.
pub fn accept_follow_request(
    db: &Database,
    target_id: &str,
    follower_id: &str,
    notification_id: &str,
) -> Result<()> {
    let follow = db
        .get_follow(follower_id, target_id)?
        .ok_or_else(|| CoreError::NotFound {
            entity: "follow request",
            id: follower_id.to_string(),
        })?;
    if follow.is_accepted {
        return Err(ConflictError::AlreadyAccepted {
            follower_id: follower_id.to_string(),
        }
        .into());
    }

    let tx = db.conn().unchecked_transaction()?;

    db.set_follow_accepted(follower_id, target_id)?;
    db.insert_notification(&Notification::new(
        follower_id,
        NotificationKind::FollowAccepted,
        Some(target_id),
        None,
    ))?;

    // Rewrite the inbound request notification instead of deleting it.
    if let Some(original) = db.get_notification(notification_id)? {
        if original.user_id == target_id && original.kind == NotificationKind::RequestFollow {
            db.convert_notification(notification_id, NotificationKind::RequestAccepted)?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Decline a pending follow request addressed to `target_id`.
///
/// The pending relation and the request notification are both deleted.
///
/// # Errors
/// Not-found if no relation exists; conflict if it was already accepted.
pub fn decline_follow_request(
    db: &Database,
    target_id: &str,
    follower_id: &str,
    notification_id: &str,
) -> Result<()> {
    let follow = db
        .get_follow(follower_id, target_id)?
        .ok_or_else(|| CoreError::NotFound {
            entity: "follow request",
            id: follower_id.to_string(),
        })?;
    if follow.is_accepted {
        return Err(ConflictError::AlreadyAccepted {
            follower_id: follower_id.to_string(),
        }
        .into());
    }

    let tx = db.conn().unchecked_transaction()?;

    db.delete_follow(follower_id, target_id)?;
    if let Some(original) = db.get_notification(notification_id)? {
        if original.user_id == target_id {
            db.delete_notification(notification_id)?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Star or unstar a path. Starring someone else's path notifies the owner.
///
/// Returns `true` when the path is now starred.
///
/// # Errors
/// Not-found for an unknown path; forbidden when the path is private and
/// not the actor's own.
pub fn toggle_star(db: &Database, actor_id: &str, path_id: &str) -> Result<bool> {
    let path = db.get_path(path_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "path",
        id: path_id.to_string(),
    })?;
    if !path.is_public && path.owner_id != actor_id {
        return Err(CoreError::Forbidden("path is private".to_string()));
    }

    let tx = db.conn().unchecked_transaction()?;

    let now_starred = if db.get_star(actor_id, path_id)?.is_some() {
        db.delete_star(actor_id, path_id)?;
        false
    } else {
        db.insert_star(&PathStar {
            user_id: actor_id.to_string(),
            path_id: path_id.to_string(),
            created_at: Utc::now(),
        })?;
        if path.owner_id != actor_id {
            db.insert_notification(&Notification::new(
                &path.owner_id,
                NotificationKind::Star,
                Some(actor_id),
                Some(path_id),
            ))?;
        }
        true
    };

    tx.commit()?;
    Ok(now_starred)
}
