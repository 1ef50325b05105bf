//! Resources inside a learning path.
//!
//! Adding and deleting resources latches the parent path's `is_modified`
//! flag. Completing one is the event that drives the streak tracker and the
//! resources-metric goals; both updates share the completion's transaction
//! so a concurrent completion cannot double-credit a goal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};
use crate::goal::{self, GoalMetric};
use crate::path::require_owned_path;
use crate::storage::Database;
use crate::streak;

/// What kind of learning unit a resource is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Article,
    Video,
    Pdf,
    Book,
    Course,
    Podcast,
    Tutorial,
    Documentation,
    Code,
    Exercise,
    Text,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Article => "article",
            ResourceKind::Video => "video",
            ResourceKind::Pdf => "pdf",
            ResourceKind::Book => "book",
            ResourceKind::Course => "course",
            ResourceKind::Podcast => "podcast",
            ResourceKind::Tutorial => "tutorial",
            ResourceKind::Documentation => "documentation",
            ResourceKind::Code => "code",
            ResourceKind::Exercise => "exercise",
            ResourceKind::Text => "text",
        }
    }

    pub fn parse(s: &str) -> ResourceKind {
        match s {
            "video" => ResourceKind::Video,
            "pdf" => ResourceKind::Pdf,
            "book" => ResourceKind::Book,
            "course" => ResourceKind::Course,
            "podcast" => ResourceKind::Podcast,
            "tutorial" => ResourceKind::Tutorial,
            "documentation" => ResourceKind::Documentation,
            "code" => ResourceKind::Code,
            "exercise" => ResourceKind::Exercise,
            "text" => ResourceKind::Text,
            _ => ResourceKind::Article,
        }
    }
}

/// One learning unit within a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub path_id: String,
    pub title: String,
    pub kind: ResourceKind,
    /// Link resources carry a URL; notes and code carry inline content
    pub url: Option<String>,
    pub content: Option<String>,
    /// Generated summary; clearable
    pub summary: Option<String>,
    pub is_completed: bool,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of [`complete_resource`].
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub resource: Resource,
    /// Present only when the completion counted as study activity
    pub streak: Option<streak::StreakUpdate>,
    /// Goals that reached their target on this event
    pub completed_goals: Vec<goal::Goal>,
}

const MAX_TITLE_LEN: usize = 200;

/// Add a resource to a path. Owner-checked; latches the path's
/// modification flag.
///
/// Double submissions are tolerated: if the path already holds a resource
/// with the same title and the same URL (or the same inline content when no
/// URL is given), the existing row is returned unchanged.
///
/// # Errors
/// Validation when the title is bad or neither URL nor content is given.
pub fn add_resource(
    db: &Database,
    actor_id: &str,
    path_id: &str,
    title: &str,
    kind: ResourceKind,
    url: Option<&str>,
    content: Option<&str>,
) -> Result<Resource> {
    let mut path = require_owned_path(db, actor_id, path_id)?;

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
    if url.is_none() && content.is_none() {
        return Err(ValidationError::MissingResourceBody.into());
    }

    if let Some(existing_id) = db.find_duplicate_resource(path_id, title, url, content)? {
        // Double submission: hand back the row that is already there.
        return require_resource(db, &existing_id);
    }

    let tx = db.conn().unchecked_transaction()?;

    let resource = Resource {
        id: Uuid::new_v4().to_string(),
        path_id: path_id.to_string(),
        title: title.to_string(),
        kind,
        url: url.map(str::to_string),
        content: content.map(str::to_string),
        summary: None,
        is_completed: false,
        position: db.next_resource_position(path_id)?,
        created_at: Utc::now(),
    };
    db.insert_resource(&resource)?;

    path.is_modified = true;
    path.updated_at = Utc::now();
    db.update_path_record(&path)?;

    tx.commit()?;
    Ok(resource)
}

/// Partial update for a resource. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ResourceUpdate {
    pub title: Option<String>,
    pub kind: Option<ResourceKind>,
    pub url: Option<String>,
    pub content: Option<String>,
}

/// Apply a partial update to a resource. Owner-checked; latches the path's
/// modification flag.
pub fn update_resource(
    db: &Database,
    actor_id: &str,
    resource_id: &str,
    update: ResourceUpdate,
) -> Result<Resource> {
    let mut resource = require_resource(db, resource_id)?;
    let mut path = require_owned_path(db, actor_id, &resource.path_id)?;

    if let Some(title) = &update.title {
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
    }

    let tx = db.conn().unchecked_transaction()?;

    if let Some(title) = update.title {
        resource.title = title;
    }
    if let Some(kind) = update.kind {
        resource.kind = kind;
    }
    if let Some(url) = update.url {
        resource.url = Some(url);
    }
    if let Some(content) = update.content {
        resource.content = Some(content);
    }
    db.update_resource_record(&resource)?;

    path.is_modified = true;
    path.updated_at = Utc::now();
    db.update_path_record(&path)?;

    tx.commit()?;
    Ok(resource)
}

/// Delete a resource. Owner-checked; latches the path's modification flag.
pub fn delete_resource(db: &Database, actor_id: &str, resource_id: &str) -> Result<()> {
    let resource = require_resource(db, resource_id)?;
    let mut path = require_owned_path(db, actor_id, &resource.path_id)?;

    let tx = db.conn().unchecked_transaction()?;
    db.delete_resource(resource_id)?;
    path.is_modified = true;
    path.updated_at = Utc::now();
    db.update_path_record(&path)?;
    tx.commit()?;
    Ok(())
}

/// Mark a resource complete or incomplete.
///
/// Completion (`completed == true`) counts as study activity for `today`:
/// the streak advances and every active resources-metric goal is credited,
/// all inside the completion's transaction. Un-completing triggers nothing
/// and never claws progress back.
pub fn complete_resource(
    db: &Database,
    actor_id: &str,
    resource_id: &str,
    completed: bool,
    today: NaiveDate,
) -> Result<CompletionOutcome> {
    let mut resource = require_resource(db, resource_id)?;
    require_owned_path(db, actor_id, &resource.path_id)?;

    let tx = db.conn().unchecked_transaction()?;

    resource.is_completed = completed;
    db.set_resource_completed(resource_id, completed)?;

    let (streak_update, completed_goals) = if completed {
        let update = streak::record_study_activity(db, actor_id, today)?;
        let goals = goal::record_goal_progress(db, actor_id, GoalMetric::Resources)?;
        (Some(update), goals)
    } else {
        (None, Vec::new())
    };

    tx.commit()?;
    Ok(CompletionOutcome {
        resource,
        streak: streak_update,
        completed_goals,
    })
}

/// Attach or clear a generated summary on a resource. Owner-checked.
pub fn set_summary(
    db: &Database,
    actor_id: &str,
    resource_id: &str,
    summary: Option<&str>,
) -> Result<()> {
    let resource = require_resource(db, resource_id)?;
    require_owned_path(db, actor_id, &resource.path_id)?;
    db.set_resource_summary(resource_id, summary)?;
    Ok(())
}

pub(crate) fn require_resource(db: &Database, resource_id: &str) -> Result<Resource> {
    db.get_resource(resource_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "resource",
        id: resource_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::provision_user;
    use crate::path::{create_path, Difficulty};

    fn setup() -> (Database, String, String) {
        let db = Database::open_memory().unwrap();
        let user = provision_user(&db, "auth0|r", "rae", "rae@example.com", 3).unwrap();
        let path = create_path(&db, &user.id, "Systems", None, None, Difficulty::Intermediate)
            .unwrap();
        (db, user.id, path.id)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn add_requires_url_or_content() {
        let (db, user, path) = setup();
        let err = add_resource(&db, &user, &path, "Note", ResourceKind::Text, None, None);
        assert!(err.is_err());
    }

    #[test]
    fn add_latches_path_modification() {
        let (db, user, path) = setup();
        add_resource(
            &db,
            &user,
            &path,
            "TCP illustrated",
            ResourceKind::Book,
            Some("https://example.com/tcp"),
            None,
        )
        .unwrap();
        assert!(db.get_path(&path).unwrap().unwrap().is_modified);
    }

    #[test]
    fn duplicate_submission_returns_existing_row() {
        let (db, user, path) = setup();
        let first = add_resource(
            &db,
            &user,
            &path,
            "Intro video",
            ResourceKind::Video,
            Some("https://example.com/v"),
            None,
        )
        .unwrap();
        let second = add_resource(
            &db,
            &user,
            &path,
            "Intro video",
            ResourceKind::Video,
            Some("https://example.com/v"),
            None,
        )
        .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(db.list_resources(&path).unwrap().len(), 1);
    }

    #[test]
    fn same_title_different_url_is_not_a_duplicate() {
        let (db, user, path) = setup();
        add_resource(&db, &user, &path, "Docs", ResourceKind::Documentation, Some("https://a"), None)
            .unwrap();
        add_resource(&db, &user, &path, "Docs", ResourceKind::Documentation, Some("https://b"), None)
            .unwrap();
        assert_eq!(db.list_resources(&path).unwrap().len(), 2);
    }

    #[test]
    fn completion_advances_streak_and_uncompletion_does_not() {
        let (db, user, path) = setup();
        let r = add_resource(&db, &user, &path, "Ch 1", ResourceKind::Book, Some("https://b"), None)
            .unwrap();

        let outcome = complete_resource(&db, &user, &r.id, true, day("2026-03-10")).unwrap();
        assert_eq!(outcome.streak.unwrap().streak_count, 1);
        assert!(db.get_resource(&r.id).unwrap().unwrap().is_completed);

        let outcome = complete_resource(&db, &user, &r.id, false, day("2026-03-11")).unwrap();
        assert!(outcome.streak.is_none());
        let stored = db.get_user(&user).unwrap().unwrap();
        assert_eq!(stored.streak_count, 1);
        assert_eq!(stored.last_study_date, Some(day("2026-03-10")));
    }

    #[test]
    fn update_edits_fields_and_latches_the_path() {
        let (db, user, path) = setup();
        let r = add_resource(&db, &user, &path, "Draft", ResourceKind::Text, None, Some("wip"))
            .unwrap();
        // Clear the latch left behind by the add.
        let mut stored_path = db.get_path(&path).unwrap().unwrap();
        stored_path.is_modified = false;
        db.update_path_record(&stored_path).unwrap();

        let updated = update_resource(
            &db,
            &user,
            &r.id,
            ResourceUpdate {
                title: Some("Final notes".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.title, "Final notes");
        assert_eq!(updated.content.as_deref(), Some("wip"));
        assert!(db.get_path(&path).unwrap().unwrap().is_modified);
    }

    #[test]
    fn summary_can_be_set_and_cleared() {
        let (db, user, path) = setup();
        let r = add_resource(&db, &user, &path, "Ch 1", ResourceKind::Book, Some("https://b"), None)
            .unwrap();
        set_summary(&db, &user, &r.id, Some("Key points...")).unwrap();
        assert_eq!(
            db.get_resource(&r.id).unwrap().unwrap().summary.as_deref(),
            Some("Key points...")
        );
        set_summary(&db, &user, &r.id, None).unwrap();
        assert!(db.get_resource(&r.id).unwrap().unwrap().summary.is_none());
    }
}
