//! SQLite-backed relational store for the trailhead domain.
//!
//! One `Database` wraps one connection and exposes row-level accessors for
//! every entity. Business rules live in the domain modules; multi-write
//! operations there open a transaction on this connection with
//! `unchecked_transaction()` so the reads and writes of one operation are
//! atomic.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError};
use crate::flashcard::Flashcard;
use crate::goal::{Goal, GoalKind, GoalMetric};
use crate::identity::User;
use crate::notification::{Notification, NotificationKind};
use crate::path::{Difficulty, LearningPath};
use crate::quiz::{Quiz, QuizAttempt, QuizQuestion};
use crate::resource::{Resource, ResourceKind};
use crate::social::{Follow, PathStar};

type SqlResult<T> = Result<T, rusqlite::Error>;

// === Helper Functions ===

/// Parse an RFC 3339 timestamp with fallback to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional `%Y-%m-%d` day column.
fn parse_day(day_str: Option<String>) -> Option<NaiveDate> {
    day_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Decode a JSON question set stored in a TEXT column.
fn parse_questions(json: &str) -> SqlResult<Vec<QuizQuestion>> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_user(row: &rusqlite::Row) -> SqlResult<User> {
    let last_study: Option<String> = row.get(6)?;
    let created: String = row.get(8)?;
    Ok(User {
        id: row.get(0)?,
        external_id: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        is_private: row.get(4)?,
        streak_count: row.get(5)?,
        last_study_date: parse_day(last_study),
        daily_goal: row.get(7)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_path(row: &rusqlite::Row) -> SqlResult<LearningPath> {
    let difficulty: String = row.get(5)?;
    let created: String = row.get(9)?;
    let updated: String = row.get(10)?;
    Ok(LearningPath {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        difficulty: Difficulty::parse(&difficulty),
        is_public: row.get(6)?,
        is_modified: row.get(7)?,
        cloned_from: row.get(8)?,
        created_at: parse_datetime_fallback(&created),
        updated_at: parse_datetime_fallback(&updated),
    })
}

fn row_to_resource(row: &rusqlite::Row) -> SqlResult<Resource> {
    let kind: String = row.get(3)?;
    let created: String = row.get(9)?;
    Ok(Resource {
        id: row.get(0)?,
        path_id: row.get(1)?,
        title: row.get(2)?,
        kind: ResourceKind::parse(&kind),
        url: row.get(4)?,
        content: row.get(5)?,
        summary: row.get(6)?,
        is_completed: row.get(7)?,
        position: row.get(8)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_quiz(row: &rusqlite::Row) -> SqlResult<Quiz> {
    let questions: String = row.get(2)?;
    let created: String = row.get(3)?;
    Ok(Quiz {
        id: row.get(0)?,
        path_id: row.get(1)?,
        questions: parse_questions(&questions)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_attempt(row: &rusqlite::Row) -> SqlResult<QuizAttempt> {
    let created: String = row.get(6)?;
    Ok(QuizAttempt {
        id: row.get(0)?,
        quiz_id: row.get(1)?,
        user_id: row.get(2)?,
        score: row.get(3)?,
        total_questions: row.get(4)?,
        passed: row.get(5)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_goal(row: &rusqlite::Row) -> SqlResult<Goal> {
    let kind: String = row.get(5)?;
    let metric: String = row.get(6)?;
    let created: String = row.get(8)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        target: row.get(3)?,
        progress: row.get(4)?,
        kind: GoalKind::parse(&kind),
        metric: GoalMetric::parse(&metric),
        is_completed: row.get(7)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_follow(row: &rusqlite::Row) -> SqlResult<Follow> {
    let created: String = row.get(3)?;
    Ok(Follow {
        follower_id: row.get(0)?,
        following_id: row.get(1)?,
        is_accepted: row.get(2)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_notification(row: &rusqlite::Row) -> SqlResult<Notification> {
    let kind: String = row.get(2)?;
    let created: String = row.get(6)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: NotificationKind::parse(&kind),
        actor_id: row.get(3)?,
        path_id: row.get(4)?,
        is_read: row.get(5)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_star(row: &rusqlite::Row) -> SqlResult<PathStar> {
    let created: String = row.get(2)?;
    Ok(PathStar {
        user_id: row.get(0)?,
        path_id: row.get(1)?,
        created_at: parse_datetime_fallback(&created),
    })
}

fn row_to_flashcard(row: &rusqlite::Row) -> SqlResult<Flashcard> {
    let created: String = row.get(4)?;
    Ok(Flashcard {
        id: row.get(0)?,
        path_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        created_at: parse_datetime_fallback(&created),
    })
}

/// SQLite database holding the full relational model.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/trailhead.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("trailhead.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (tests and ephemeral use).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        // Cascading deletes depend on FK enforcement being switched on.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(DatabaseError::from)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Users ===

    pub fn insert_user(&self, user: &User) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, external_id, username, email, is_private, streak_count,
                                last_study_date, daily_goal, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.id,
                user.external_id,
                user.username,
                user.email,
                user.is_private,
                user.streak_count,
                user.last_study_date.map(|d| d.format("%Y-%m-%d").to_string()),
                user.daily_goal,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> SqlResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, external_id, username, email, is_private, streak_count,
                        last_study_date, daily_goal, created_at
                 FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()
    }

    pub fn get_user_by_external_id(&self, external_id: &str) -> SqlResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, external_id, username, email, is_private, streak_count,
                        last_study_date, daily_goal, created_at
                 FROM users WHERE external_id = ?1",
                params![external_id],
                row_to_user,
            )
            .optional()
    }

    pub fn get_user_by_email(&self, email: &str) -> SqlResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, external_id, username, email, is_private, streak_count,
                        last_study_date, daily_goal, created_at
                 FROM users WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .optional()
    }

    pub fn get_user_by_username(&self, username: &str) -> SqlResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, external_id, username, email, is_private, streak_count,
                        last_study_date, daily_goal, created_at
                 FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .optional()
    }

    pub fn update_user_profile(
        &self,
        id: &str,
        username: &str,
        email: &str,
        external_id: &str,
    ) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE users SET username = ?2, email = ?3, external_id = ?4 WHERE id = ?1",
            params![id, username, email, external_id],
        )?;
        Ok(())
    }

    pub fn set_user_privacy(&self, id: &str, is_private: bool) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE users SET is_private = ?2 WHERE id = ?1",
            params![id, is_private],
        )?;
        Ok(())
    }

    pub fn set_daily_goal(&self, id: &str, daily_goal: u32) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE users SET daily_goal = ?2 WHERE id = ?1",
            params![id, daily_goal],
        )?;
        Ok(())
    }

    pub fn update_user_streak(
        &self,
        id: &str,
        streak_count: u32,
        last_study_date: NaiveDate,
    ) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE users SET streak_count = ?2, last_study_date = ?3 WHERE id = ?1",
            params![
                id,
                streak_count,
                last_study_date.format("%Y-%m-%d").to_string()
            ],
        )?;
        Ok(())
    }

    // === Paths ===

    pub fn insert_path(&self, path: &LearningPath) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO paths (id, owner_id, title, description, category, difficulty,
                                is_public, is_modified, cloned_from, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                path.id,
                path.owner_id,
                path.title,
                path.description,
                path.category,
                path.difficulty.as_str(),
                path.is_public,
                path.is_modified,
                path.cloned_from,
                path.created_at.to_rfc3339(),
                path.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_path(&self, id: &str) -> SqlResult<Option<LearningPath>> {
        self.conn
            .query_row(
                "SELECT id, owner_id, title, description, category, difficulty,
                        is_public, is_modified, cloned_from, created_at, updated_at
                 FROM paths WHERE id = ?1",
                params![id],
                row_to_path,
            )
            .optional()
    }

    pub fn list_paths_by_owner(&self, owner_id: &str) -> SqlResult<Vec<LearningPath>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, description, category, difficulty,
                    is_public, is_modified, cloned_from, created_at, updated_at
             FROM paths WHERE owner_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![owner_id], row_to_path)?;
        rows.collect()
    }

    pub fn list_public_paths(&self) -> SqlResult<Vec<LearningPath>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, title, description, category, difficulty,
                    is_public, is_modified, cloned_from, created_at, updated_at
             FROM paths WHERE is_public = 1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_path)?;
        rows.collect()
    }

    pub fn update_path_record(&self, path: &LearningPath) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE paths SET title = ?2, description = ?3, category = ?4, difficulty = ?5,
                              is_public = ?6, is_modified = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                path.id,
                path.title,
                path.description,
                path.category,
                path.difficulty.as_str(),
                path.is_public,
                path.is_modified,
                path.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_path(&self, id: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM paths WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Id of the actor's existing clone of `source_id`, if any.
    pub fn find_clone_of(&self, owner_id: &str, source_id: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT id FROM paths WHERE owner_id = ?1 AND cloned_from = ?2",
                params![owner_id, source_id],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }

    // === Resources ===

    pub fn insert_resource(&self, resource: &Resource) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO resources (id, path_id, title, kind, url, content, summary,
                                    is_completed, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                resource.id,
                resource.path_id,
                resource.title,
                resource.kind.as_str(),
                resource.url,
                resource.content,
                resource.summary,
                resource.is_completed,
                resource.position,
                resource.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_resource(&self, id: &str) -> SqlResult<Option<Resource>> {
        self.conn
            .query_row(
                "SELECT id, path_id, title, kind, url, content, summary,
                        is_completed, position, created_at
                 FROM resources WHERE id = ?1",
                params![id],
                row_to_resource,
            )
            .optional()
    }

    pub fn list_resources(&self, path_id: &str) -> SqlResult<Vec<Resource>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path_id, title, kind, url, content, summary,
                    is_completed, position, created_at
             FROM resources WHERE path_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![path_id], row_to_resource)?;
        rows.collect()
    }

    /// Dedup lookup for double submissions: same path, same title, and the
    /// same URL -- or the same inline content for resources without one.
    pub fn find_duplicate_resource(
        &self,
        path_id: &str,
        title: &str,
        url: Option<&str>,
        content: Option<&str>,
    ) -> SqlResult<Option<String>> {
        match url {
            Some(url) => self
                .conn
                .query_row(
                    "SELECT id FROM resources WHERE path_id = ?1 AND title = ?2 AND url = ?3",
                    params![path_id, title, url],
                    |row| row.get::<_, String>(0),
                )
                .optional(),
            None => self
                .conn
                .query_row(
                    "SELECT id FROM resources
                     WHERE path_id = ?1 AND title = ?2 AND url IS NULL AND content = ?3",
                    params![path_id, title, content],
                    |row| row.get::<_, String>(0),
                )
                .optional(),
        }
    }

    pub fn update_resource_record(&self, resource: &Resource) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE resources SET title = ?2, kind = ?3, url = ?4, content = ?5 WHERE id = ?1",
            params![
                resource.id,
                resource.title,
                resource.kind.as_str(),
                resource.url,
                resource.content,
            ],
        )?;
        Ok(())
    }

    pub fn next_resource_position(&self, path_id: &str) -> SqlResult<i64> {
        self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM resources WHERE path_id = ?1",
            params![path_id],
            |row| row.get(0),
        )
    }

    pub fn set_resource_completed(&self, id: &str, is_completed: bool) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE resources SET is_completed = ?2 WHERE id = ?1",
            params![id, is_completed],
        )?;
        Ok(())
    }

    pub fn set_resource_summary(&self, id: &str, summary: Option<&str>) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE resources SET summary = ?2 WHERE id = ?1",
            params![id, summary],
        )?;
        Ok(())
    }

    pub fn delete_resource(&self, id: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM resources WHERE id = ?1", params![id])?;
        Ok(())
    }

    // === Quizzes ===

    pub fn insert_quiz(&self, quiz: &Quiz) -> SqlResult<()> {
        let questions = serde_json::to_string(&quiz.questions).map_err(|e| {
            rusqlite::Error::ToSqlConversionFailure(Box::new(e))
        })?;
        self.conn.execute(
            "INSERT INTO quizzes (id, path_id, questions, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![quiz.id, quiz.path_id, questions, quiz.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_quiz(&self, id: &str) -> SqlResult<Option<Quiz>> {
        self.conn
            .query_row(
                "SELECT id, path_id, questions, created_at FROM quizzes WHERE id = ?1",
                params![id],
                row_to_quiz,
            )
            .optional()
    }

    pub fn get_quiz_by_path(&self, path_id: &str) -> SqlResult<Option<Quiz>> {
        self.conn
            .query_row(
                "SELECT id, path_id, questions, created_at FROM quizzes WHERE path_id = ?1",
                params![path_id],
                row_to_quiz,
            )
            .optional()
    }

    pub fn insert_quiz_attempt(&self, attempt: &QuizAttempt) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO quiz_attempts (id, quiz_id, user_id, score, total_questions,
                                        passed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                attempt.id,
                attempt.quiz_id,
                attempt.user_id,
                attempt.score,
                attempt.total_questions,
                attempt.passed,
                attempt.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_quiz_attempts(&self, quiz_id: &str) -> SqlResult<Vec<QuizAttempt>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quiz_id, user_id, score, total_questions, passed, created_at
             FROM quiz_attempts WHERE quiz_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![quiz_id], row_to_attempt)?;
        rows.collect()
    }

    // === Flashcards ===

    pub fn insert_flashcard(&self, card: &Flashcard) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO flashcards (id, path_id, front, back, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card.id,
                card.path_id,
                card.front,
                card.back,
                card.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn list_flashcards(&self, path_id: &str) -> SqlResult<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path_id, front, back, created_at
             FROM flashcards WHERE path_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![path_id], row_to_flashcard)?;
        rows.collect()
    }

    pub fn delete_flashcards(&self, path_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "DELETE FROM flashcards WHERE path_id = ?1",
            params![path_id],
        )?;
        Ok(())
    }

    // === Goals ===

    pub fn insert_goal(&self, goal: &Goal) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO goals (id, user_id, title, target, progress, kind, metric,
                                is_completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                goal.id,
                goal.user_id,
                goal.title,
                goal.target,
                goal.progress,
                goal.kind.as_str(),
                goal.metric.as_str(),
                goal.is_completed,
                goal.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_goal(&self, id: &str) -> SqlResult<Option<Goal>> {
        self.conn
            .query_row(
                "SELECT id, user_id, title, target, progress, kind, metric,
                        is_completed, created_at
                 FROM goals WHERE id = ?1",
                params![id],
                row_to_goal,
            )
            .optional()
    }

    pub fn list_goals(&self, user_id: &str) -> SqlResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, target, progress, kind, metric,
                    is_completed, created_at
             FROM goals WHERE user_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_goal)?;
        rows.collect()
    }

    /// Goals still accepting credit for the given metric.
    pub fn active_goals(&self, user_id: &str, metric: GoalMetric) -> SqlResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, target, progress, kind, metric,
                    is_completed, created_at
             FROM goals
             WHERE user_id = ?1 AND metric = ?2 AND is_completed = 0
             ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![user_id, metric.as_str()], row_to_goal)?;
        rows.collect()
    }

    pub fn update_goal_progress(
        &self,
        id: &str,
        progress: u32,
        is_completed: bool,
    ) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE goals SET progress = ?2, is_completed = ?3 WHERE id = ?1",
            params![id, progress, is_completed],
        )?;
        Ok(())
    }

    pub fn delete_goal(&self, id: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(())
    }

    // === Follows ===

    pub fn get_follow(&self, follower_id: &str, following_id: &str) -> SqlResult<Option<Follow>> {
        self.conn
            .query_row(
                "SELECT follower_id, following_id, is_accepted, created_at
                 FROM follows WHERE follower_id = ?1 AND following_id = ?2",
                params![follower_id, following_id],
                row_to_follow,
            )
            .optional()
    }

    pub fn insert_follow(&self, follow: &Follow) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO follows (follower_id, following_id, is_accepted, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                follow.follower_id,
                follow.following_id,
                follow.is_accepted,
                follow.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn delete_follow(&self, follower_id: &str, following_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2",
            params![follower_id, following_id],
        )?;
        Ok(())
    }

    pub fn set_follow_accepted(&self, follower_id: &str, following_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE follows SET is_accepted = 1
             WHERE follower_id = ?1 AND following_id = ?2",
            params![follower_id, following_id],
        )?;
        Ok(())
    }

    /// Relations where the user is being followed (accepted and pending).
    pub fn list_followers(&self, user_id: &str) -> SqlResult<Vec<Follow>> {
        let mut stmt = self.conn.prepare(
            "SELECT follower_id, following_id, is_accepted, created_at
             FROM follows WHERE following_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_follow)?;
        rows.collect()
    }

    /// Relations where the user is the follower (accepted and pending).
    pub fn list_following(&self, user_id: &str) -> SqlResult<Vec<Follow>> {
        let mut stmt = self.conn.prepare(
            "SELECT follower_id, following_id, is_accepted, created_at
             FROM follows WHERE follower_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_follow)?;
        rows.collect()
    }

    // === Notifications ===

    pub fn insert_notification(&self, notification: &Notification) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO notifications (id, user_id, kind, actor_id, path_id, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                notification.id,
                notification.user_id,
                notification.kind.as_str(),
                notification.actor_id,
                notification.path_id,
                notification.is_read,
                notification.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_notification(&self, id: &str) -> SqlResult<Option<Notification>> {
        self.conn
            .query_row(
                "SELECT id, user_id, kind, actor_id, path_id, is_read, created_at
                 FROM notifications WHERE id = ?1",
                params![id],
                row_to_notification,
            )
            .optional()
    }

    pub fn list_notifications(&self, user_id: &str) -> SqlResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, kind, actor_id, path_id, is_read, created_at
             FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_notification)?;
        rows.collect()
    }

    pub fn mark_notification_read(&self, id: &str) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    pub fn mark_all_notifications_read(&self, user_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(())
    }

    pub fn unread_notification_count(&self, user_id: &str) -> SqlResult<u32> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
            params![user_id],
            |row| row.get(0),
        )
    }

    /// Rewrite a notification's kind in place and mark it read.
    pub fn convert_notification(&self, id: &str, kind: NotificationKind) -> SqlResult<()> {
        self.conn.execute(
            "UPDATE notifications SET kind = ?2, is_read = 1 WHERE id = ?1",
            params![id, kind.as_str()],
        )?;
        Ok(())
    }

    pub fn delete_notification(&self, id: &str) -> SqlResult<()> {
        self.conn
            .execute("DELETE FROM notifications WHERE id = ?1", params![id])?;
        Ok(())
    }

    // === Stars ===

    pub fn get_star(&self, user_id: &str, path_id: &str) -> SqlResult<Option<PathStar>> {
        self.conn
            .query_row(
                "SELECT user_id, path_id, created_at
                 FROM path_stars WHERE user_id = ?1 AND path_id = ?2",
                params![user_id, path_id],
                row_to_star,
            )
            .optional()
    }

    pub fn insert_star(&self, star: &PathStar) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO path_stars (user_id, path_id, created_at) VALUES (?1, ?2, ?3)",
            params![star.user_id, star.path_id, star.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn delete_star(&self, user_id: &str, path_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "DELETE FROM path_stars WHERE user_id = ?1 AND path_id = ?2",
            params![user_id, path_id],
        )?;
        Ok(())
    }

    pub fn list_stars(&self, user_id: &str) -> SqlResult<Vec<PathStar>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, path_id, created_at
             FROM path_stars WHERE user_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_star)?;
        rows.collect()
    }
}
