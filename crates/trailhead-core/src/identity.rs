//! Local user records and identity provisioning.
//!
//! Authentication itself lives with an external identity provider; this
//! module only reconciles the provider's identity against the local `users`
//! table. Provisioning is an explicit two-step lookup (external id first,
//! then email) rather than an insert-and-catch-conflict fallback, so the
//! race between two keys resolves the same way every time: an existing
//! email wins and gets the external id rebound onto it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::Database;

/// A local user record mirroring an externally-authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Identity provider's subject id
    pub external_id: String,
    pub username: String,
    pub email: String,
    /// Private profiles require follow requests to be accepted
    pub is_private: bool,
    /// Consecutive study days
    pub streak_count: u32,
    /// Last day a resource completion counted toward the streak
    pub last_study_date: Option<NaiveDate>,
    /// Target resource completions per day
    pub daily_goal: u32,
    pub created_at: DateTime<Utc>,
}

const MAX_USERNAME_LEN: usize = 40;

fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::Empty { field: "username" }.into());
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            len: username.len(),
            max: MAX_USERNAME_LEN,
        }
        .into());
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Empty { field: "email" }.into());
    }
    // Shape check only; the provider already verified the address.
    if !email.contains('@') {
        return Err(ValidationError::OutOfRange {
            field: "email",
            message: format!("'{email}' is not an email address"),
        }
        .into());
    }
    Ok(())
}

/// Reconcile an externally-authenticated identity with the local user table.
///
/// Lookup order:
/// 1. by external id -- refresh username/email on the existing record;
/// 2. by email -- rebind the external id onto the existing record;
/// 3. no match -- insert a fresh record with `daily_goal` as its target.
///
/// `daily_goal` only seeds fresh records; an existing user's target is
/// never touched here (that is [`set_daily_goal`]'s job).
///
/// Returns the provisioned user either way.
///
/// # Errors
/// Returns a validation error for an empty username, malformed email, or a
/// zero daily goal, or a database error if the write fails.
pub fn provision_user(
    db: &Database,
    external_id: &str,
    username: &str,
    email: &str,
    daily_goal: u32,
) -> Result<User> {
    if external_id.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "external_id",
        }
        .into());
    }
    validate_username(username)?;
    validate_email(email)?;
    if daily_goal == 0 {
        return Err(ValidationError::OutOfRange {
            field: "daily_goal",
            message: "must be at least 1".to_string(),
        }
        .into());
    }

    let tx = db.conn().unchecked_transaction()?;

    let user = if let Some(mut existing) = db.get_user_by_external_id(external_id)? {
        existing.username = username.to_string();
        existing.email = email.to_string();
        db.update_user_profile(&existing.id, username, email, external_id)?;
        existing
    } else if let Some(mut existing) = db.get_user_by_email(email)? {
        // Same mailbox signed in through a new provider identity.
        existing.external_id = external_id.to_string();
        existing.username = username.to_string();
        db.update_user_profile(&existing.id, username, email, external_id)?;
        existing
    } else {
        let user = User {
            id: Uuid::new_v4().to_string(),
            external_id: external_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            is_private: false,
            streak_count: 0,
            last_study_date: None,
            daily_goal,
            created_at: Utc::now(),
        };
        db.insert_user(&user)?;
        user
    };

    tx.commit()?;
    Ok(user)
}

/// Flip a user's profile between public and private.
///
/// Existing follow relations are left untouched; privacy only gates new
/// follow attempts.
pub fn set_privacy(db: &Database, user_id: &str, is_private: bool) -> Result<()> {
    let user = db.get_user(user_id)?.ok_or_else(|| crate::error::CoreError::NotFound {
        entity: "user",
        id: user_id.to_string(),
    })?;
    db.set_user_privacy(&user.id, is_private)?;
    Ok(())
}

/// Set the user's target resource completions per day.
pub fn set_daily_goal(db: &Database, user_id: &str, daily_goal: u32) -> Result<()> {
    if daily_goal == 0 {
        return Err(ValidationError::OutOfRange {
            field: "daily_goal",
            message: "must be at least 1".to_string(),
        }
        .into());
    }
    let user = db.get_user(user_id)?.ok_or_else(|| crate::error::CoreError::NotFound {
        entity: "user",
        id: user_id.to_string(),
    })?;
    db.set_daily_goal(&user.id, daily_goal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_memory().unwrap()
    }

    #[test]
    fn provision_creates_fresh_user() {
        let db = db();
        let user = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 3).unwrap();
        assert_eq!(user.streak_count, 0);
        assert!(user.last_study_date.is_none());

        let fetched = db.get_user(&user.id).unwrap().unwrap();
        assert_eq!(fetched.username, "ada");
        assert_eq!(fetched.external_id, "auth0|abc");
    }

    #[test]
    fn provision_refreshes_by_external_id() {
        let db = db();
        let first = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 3).unwrap();
        let second = provision_user(&db, "auth0|abc", "ada.l", "lovelace@example.com", 3).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.username, "ada.l");
        assert_eq!(second.email, "lovelace@example.com");
    }

    #[test]
    fn provision_rebinds_external_id_by_email() {
        let db = db();
        let first = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 3).unwrap();
        // New provider identity, same mailbox: email wins, id is rebound.
        let second = provision_user(&db, "github|42", "ada", "ada@example.com", 3).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.external_id, "github|42");
    }

    #[test]
    fn provision_rejects_bad_input() {
        let db = db();
        assert!(provision_user(&db, "auth0|abc", "", "a@b.com", 3).is_err());
        assert!(provision_user(&db, "auth0|abc", "ada", "not-an-email", 3).is_err());
        assert!(provision_user(&db, "  ", "ada", "a@b.com", 3).is_err());
        assert!(provision_user(&db, "auth0|abc", "ada", "a@b.com", 0).is_err());
    }

    #[test]
    fn provision_seeds_daily_goal_on_fresh_users_only() {
        let db = db();
        let user = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 5).unwrap();
        assert_eq!(user.daily_goal, 5);

        set_daily_goal(&db, &user.id, 7).unwrap();
        // A later sign-in must not reset a target the user chose.
        provision_user(&db, "auth0|abc", "ada", "ada@example.com", 5).unwrap();
        assert_eq!(db.get_user(&user.id).unwrap().unwrap().daily_goal, 7);
    }

    #[test]
    fn privacy_toggle_persists() {
        let db = db();
        let user = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 3).unwrap();
        set_privacy(&db, &user.id, true).unwrap();
        assert!(db.get_user(&user.id).unwrap().unwrap().is_private);
    }

    #[test]
    fn daily_goal_must_be_positive() {
        let db = db();
        let user = provision_user(&db, "auth0|abc", "ada", "ada@example.com", 3).unwrap();
        assert!(set_daily_goal(&db, &user.id, 0).is_err());
        set_daily_goal(&db, &user.id, 5).unwrap();
        assert_eq!(db.get_user(&user.id).unwrap().unwrap().daily_goal, 5);
    }
}
