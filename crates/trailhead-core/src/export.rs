//! Full per-user data export.
//!
//! Dumps everything the requesting user owns -- paths with their nested
//! resources, quiz content and attempts, flashcards, plus goals, stars,
//! follow relations, and the notification feed -- as one pretty-printed
//! JSON document.

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::flashcard::Flashcard;
use crate::goal::Goal;
use crate::identity::User;
use crate::notification::Notification;
use crate::path::LearningPath;
use crate::quiz::{Quiz, QuizAttempt};
use crate::resource::Resource;
use crate::social::{Follow, PathStar};
use crate::storage::Database;

/// One owned path with everything hanging off it.
#[derive(Debug, Serialize)]
pub struct PathExport {
    #[serde(flatten)]
    pub path: LearningPath,
    pub resources: Vec<Resource>,
    pub quiz: Option<Quiz>,
    pub quiz_attempts: Vec<QuizAttempt>,
    pub flashcards: Vec<Flashcard>,
}

/// The complete export document.
#[derive(Debug, Serialize)]
pub struct UserExport {
    pub user: User,
    pub paths: Vec<PathExport>,
    pub goals: Vec<Goal>,
    pub stars: Vec<PathStar>,
    pub following: Vec<Follow>,
    pub followers: Vec<Follow>,
    pub notifications: Vec<Notification>,
}

/// Assemble the export document for a user.
pub fn export_user_data(db: &Database, user_id: &str) -> Result<UserExport> {
    let user = db.get_user(user_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "user",
        id: user_id.to_string(),
    })?;

    let mut paths = Vec::new();
    for path in db.list_paths_by_owner(user_id)? {
        let resources = db.list_resources(&path.id)?;
        let quiz = db.get_quiz_by_path(&path.id)?;
        let quiz_attempts = match &quiz {
            Some(q) => db.list_quiz_attempts(&q.id)?,
            None => Vec::new(),
        };
        let flashcards = db.list_flashcards(&path.id)?;
        paths.push(PathExport {
            path,
            resources,
            quiz,
            quiz_attempts,
            flashcards,
        });
    }

    Ok(UserExport {
        paths,
        goals: db.list_goals(user_id)?,
        stars: db.list_stars(user_id)?,
        following: db.list_following(user_id)?,
        followers: db.list_followers(user_id)?,
        notifications: db.list_notifications(user_id)?,
        user,
    })
}

/// Export a user's data as a pretty-printed JSON string.
pub fn export_user_data_json(db: &Database, user_id: &str) -> Result<String> {
    let export = export_user_data(db, user_id)?;
    Ok(serde_json::to_string_pretty(&export)?)
}
