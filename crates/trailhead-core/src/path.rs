//! Learning paths: CRUD, the clone operation, and the publish gate.
//!
//! A path cloned from someone else starts private and unmodified. Making it
//! public again is gated on `is_modified`, which latches to true on the
//! first metadata edit or resource change and never resets -- republishing
//! a byte-identical copy of someone else's work is the thing the gate
//! exists to stop. A clone of a clone is a fresh record and starts with the
//! latch clear again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConflictError, CoreError, Result, ValidationError};
use crate::storage::Database;

/// Path difficulty label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Difficulty {
        match s {
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Beginner,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Beginner
    }
}

/// A user-owned collection of learning resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub is_public: bool,
    /// One-way latch: set on the first edit after creation or cloning
    pub is_modified: bool,
    /// Lookup-only reference to the origin path; the origin may be deleted
    /// independently
    pub cloned_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a path. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PathUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub is_public: Option<bool>,
}

impl PathUpdate {
    /// True if any metadata field (not visibility) is being edited.
    fn edits_metadata(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.category.is_some()
            || self.difficulty.is_some()
    }
}

const MAX_TITLE_LEN: usize = 120;

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::Empty { field: "title" }.into());
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            len: title.len(),
            max: MAX_TITLE_LEN,
        }
        .into());
    }
    Ok(())
}

/// Load a path or fail with not-found.
pub(crate) fn require_path(db: &Database, path_id: &str) -> Result<LearningPath> {
    db.get_path(path_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "path",
        id: path_id.to_string(),
    })
}

/// Load a path and check the actor owns it.
pub(crate) fn require_owned_path(db: &Database, actor_id: &str, path_id: &str) -> Result<LearningPath> {
    let path = require_path(db, path_id)?;
    if path.owner_id != actor_id {
        return Err(CoreError::Forbidden(
            "path belongs to another user".to_string(),
        ));
    }
    Ok(path)
}

/// Create a new private path.
pub fn create_path(
    db: &Database,
    owner_id: &str,
    title: &str,
    description: Option<&str>,
    category: Option<&str>,
    difficulty: Difficulty,
) -> Result<LearningPath> {
    validate_title(title)?;
    let now = Utc::now();
    let path = LearningPath {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        category: category.map(str::to_string),
        difficulty,
        is_public: false,
        is_modified: false,
        cloned_from: None,
        created_at: now,
        updated_at: now,
    };
    db.insert_path(&path)?;
    Ok(path)
}

/// Apply a partial update to a path. Owner-checked.
///
/// Publish gate: flipping `is_public` to true on a clone whose latch is
/// still clear is rejected before anything is written, including the other
/// fields of the same request. Any metadata edit sets the latch; a
/// visibility change alone does not.
///
/// # Errors
/// Forbidden for a non-owner, validation for a bad title, conflict when
/// the publish gate fires.
pub fn update_path(
    db: &Database,
    actor_id: &str,
    path_id: &str,
    update: PathUpdate,
) -> Result<LearningPath> {
    let mut path = require_owned_path(db, actor_id, path_id)?;

    if let Some(title) = &update.title {
        validate_title(title)?;
    }

    // Gate first, against the stored latch: nothing in this request may be
    // applied if the publish is rejected.
    if update.is_public == Some(true) && path.cloned_from.is_some() && !path.is_modified {
        return Err(ConflictError::UnmodifiedClone.into());
    }

    if update.edits_metadata() {
        path.is_modified = true;
    }
    if let Some(title) = update.title {
        path.title = title;
    }
    if let Some(description) = update.description {
        path.description = Some(description);
    }
    if let Some(category) = update.category {
        path.category = Some(category);
    }
    if let Some(difficulty) = update.difficulty {
        path.difficulty = difficulty;
    }
    if let Some(is_public) = update.is_public {
        path.is_public = is_public;
    }
    path.updated_at = Utc::now();

    db.update_path_record(&path)?;
    Ok(path)
}

/// Clone a public path into the actor's own collection.
///
/// The clone starts private with the modification latch clear, keeps a
/// lookup-only reference to the source, and copies every resource with its
/// completion state reset and any generated summary carried over. At most
/// one clone per source path per user.
///
/// # Errors
/// Conflict when the actor owns the source or already cloned it; forbidden
/// when the source is private.
pub fn clone_path(db: &Database, actor_id: &str, path_id: &str) -> Result<LearningPath> {
    let source = require_path(db, path_id)?;
    if source.owner_id == actor_id {
        return Err(ConflictError::CloneOwnPath.into());
    }
    if !source.is_public {
        return Err(CoreError::Forbidden("path is private".to_string()));
    }
    if db.find_clone_of(actor_id, path_id)?.is_some() {
        return Err(ConflictError::DuplicateClone.into());
    }

    let tx = db.conn().unchecked_transaction()?;

    let now = Utc::now();
    let clone = LearningPath {
        id: Uuid::new_v4().to_string(),
        owner_id: actor_id.to_string(),
        title: source.title.clone(),
        description: source.description.clone(),
        category: source.category.clone(),
        difficulty: source.difficulty,
        is_public: false,
        is_modified: false,
        cloned_from: Some(source.id.clone()),
        created_at: now,
        updated_at: now,
    };
    db.insert_path(&clone)?;

    for mut resource in db.list_resources(&source.id)? {
        resource.id = Uuid::new_v4().to_string();
        resource.path_id = clone.id.clone();
        resource.is_completed = false;
        resource.created_at = now;
        db.insert_resource(&resource)?;
    }

    tx.commit()?;
    Ok(clone)
}

/// Delete a path and everything hanging off it. Owner-checked.
///
/// Clones of this path survive; their `cloned_from` reference simply stops
/// resolving.
pub fn delete_path(db: &Database, actor_id: &str, path_id: &str) -> Result<()> {
    require_owned_path(db, actor_id, path_id)?;
    db.delete_path(path_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::provision_user;

    fn setup() -> (Database, String, String) {
        let db = Database::open_memory().unwrap();
        let owner = provision_user(&db, "auth0|o", "omar", "omar@example.com", 3).unwrap();
        let other = provision_user(&db, "auth0|x", "xia", "xia@example.com", 3).unwrap();
        (db, owner.id, other.id)
    }

    fn public_path(db: &Database, owner: &str) -> LearningPath {
        let path = create_path(db, owner, "Rust basics", None, Some("programming"), Difficulty::Beginner)
            .unwrap();
        update_path(
            db,
            owner,
            &path.id,
            PathUpdate {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn create_validates_title() {
        let (db, owner, _) = setup();
        assert!(create_path(&db, &owner, "  ", None, None, Difficulty::Beginner).is_err());
        let long = "x".repeat(121);
        assert!(create_path(&db, &owner, &long, None, None, Difficulty::Beginner).is_err());
    }

    #[test]
    fn update_is_owner_checked() {
        let (db, owner, other) = setup();
        let path = create_path(&db, &owner, "Mine", None, None, Difficulty::Beginner).unwrap();
        let err = update_path(
            &db,
            &other,
            &path.id,
            PathUpdate {
                title: Some("Stolen".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn publish_gate_blocks_unmodified_clone() {
        let (db, owner, other) = setup();
        let source = public_path(&db, &owner);
        let clone = clone_path(&db, &other, &source.id).unwrap();

        let err = update_path(
            &db,
            &other,
            &clone.id,
            PathUpdate {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Conflict(ConflictError::UnmodifiedClone)
        ));
        // No mutation happened.
        let stored = db.get_path(&clone.id).unwrap().unwrap();
        assert!(!stored.is_public);

        // Any metadata edit opens the gate.
        update_path(
            &db,
            &other,
            &clone.id,
            PathUpdate {
                description: Some("my notes".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let published = update_path(
            &db,
            &other,
            &clone.id,
            PathUpdate {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(published.is_public);
    }

    #[test]
    fn visibility_change_alone_does_not_latch() {
        let (db, owner, _) = setup();
        let path = public_path(&db, &owner);
        assert!(!path.is_modified);
    }

    #[test]
    fn clone_rejects_own_and_duplicate() {
        let (db, owner, other) = setup();
        let source = public_path(&db, &owner);

        let err = clone_path(&db, &owner, &source.id).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(ConflictError::CloneOwnPath)));

        clone_path(&db, &other, &source.id).unwrap();
        let err = clone_path(&db, &other, &source.id).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Conflict(ConflictError::DuplicateClone)
        ));
        // Only the one clone exists.
        assert_eq!(db.list_paths_by_owner(&other).unwrap().len(), 1);
    }

    #[test]
    fn clone_of_private_path_is_forbidden() {
        let (db, owner, other) = setup();
        let path = create_path(&db, &owner, "Secret", None, None, Difficulty::Advanced).unwrap();
        let err = clone_path(&db, &other, &path.id).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn deleting_source_keeps_clone() {
        let (db, owner, other) = setup();
        let source = public_path(&db, &owner);
        let clone = clone_path(&db, &other, &source.id).unwrap();

        delete_path(&db, &owner, &source.id).unwrap();
        let survivor = db.get_path(&clone.id).unwrap().unwrap();
        assert_eq!(survivor.cloned_from.as_deref(), Some(source.id.as_str()));
        assert!(db.get_path(&source.id).unwrap().is_none());
    }
}
