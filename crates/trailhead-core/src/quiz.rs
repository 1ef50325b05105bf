//! Quizzes and quiz attempts.
//!
//! Each path holds at most one quiz; its question set is generated once
//! through the [`ContentGenerator`] seam and stored as JSON. Attempts are
//! immutable once recorded, with the pass flag derived at the configured
//! threshold (70% by default) -- exactly the threshold passes. A recorded
//! attempt also credits quizzes-metric goals, in the same transaction as
//! the insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ContentGenerator;
use crate::error::{ConflictError, CoreError, Result, ValidationError};
use crate::goal::{self, GoalMetric};
use crate::path::require_owned_path;
use crate::storage::Database;

/// Default percentage needed to pass an attempt; configurable per
/// installation through `study.pass_threshold_pct`.
pub const PASS_THRESHOLD_PCT: u32 = 70;

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub answer_index: usize,
    pub difficulty: Option<String>,
}

/// Generated question set for a path. At most one per path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub path_id: String,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

/// One scored run through a quiz. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    /// Derived at insert: score/total at or above the pass threshold
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}

/// Whether a score clears the pass threshold. Integer arithmetic, so the
/// exact boundary (e.g. 7/10) passes without float rounding; widened to
/// u64 so large question counts cannot overflow the products.
pub fn is_passing(score: u32, total_questions: u32, threshold_pct: u32) -> bool {
    u64::from(score) * 100 >= u64::from(total_questions) * u64::from(threshold_pct)
}

/// Generate and store the quiz for a path. Owner-checked.
///
/// # Errors
/// Conflict if the path already has a quiz; validation if the requested
/// question count is zero.
pub fn generate_quiz(
    db: &Database,
    generator: &dyn ContentGenerator,
    actor_id: &str,
    path_id: &str,
    question_count: usize,
) -> Result<Quiz> {
    let path = require_owned_path(db, actor_id, path_id)?;
    if question_count == 0 {
        return Err(ValidationError::OutOfRange {
            field: "question_count",
            message: "at least one question is required".to_string(),
        }
        .into());
    }
    if db.get_quiz_by_path(path_id)?.is_some() {
        return Err(ConflictError::QuizExists.into());
    }

    let resources = db.list_resources(path_id)?;
    let quiz = Quiz {
        id: Uuid::new_v4().to_string(),
        path_id: path_id.to_string(),
        questions: generator.generate_questions(&path.title, &resources, question_count),
        created_at: Utc::now(),
    };
    db.insert_quiz(&quiz)?;
    Ok(quiz)
}

/// Record a finished quiz run and credit quizzes-metric goals.
///
/// # Errors
/// Validation when the score exceeds the question count or the count is
/// zero; not-found for an unknown quiz.
pub fn record_quiz_attempt(
    db: &Database,
    actor_id: &str,
    quiz_id: &str,
    score: u32,
    total_questions: u32,
    pass_threshold_pct: u32,
) -> Result<QuizAttempt> {
    if total_questions == 0 || score > total_questions {
        return Err(ValidationError::InvalidScore {
            score,
            total: total_questions,
        }
        .into());
    }
    let quiz = db.get_quiz(quiz_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "quiz",
        id: quiz_id.to_string(),
    })?;

    let tx = db.conn().unchecked_transaction()?;

    let attempt = QuizAttempt {
        id: Uuid::new_v4().to_string(),
        quiz_id: quiz.id,
        user_id: actor_id.to_string(),
        score,
        total_questions,
        passed: is_passing(score, total_questions, pass_threshold_pct),
        created_at: Utc::now(),
    };
    db.insert_quiz_attempt(&attempt)?;
    goal::record_goal_progress(db, actor_id, GoalMetric::Quizzes)?;

    tx.commit()?;
    Ok(attempt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockGenerator;
    use crate::identity::provision_user;
    use crate::path::{create_path, Difficulty};

    fn setup() -> (Database, String, String) {
        let db = Database::open_memory().unwrap();
        let user = provision_user(&db, "auth0|q", "quinn", "quinn@example.com", 3).unwrap();
        let path = create_path(&db, &user.id, "Databases", None, None, Difficulty::Beginner)
            .unwrap();
        (db, user.id, path.id)
    }

    #[test]
    fn pass_threshold_boundary() {
        assert!(is_passing(7, 10, PASS_THRESHOLD_PCT)); // exactly 70%
        assert!(!is_passing(6, 10, PASS_THRESHOLD_PCT));
        assert!(is_passing(10, 10, PASS_THRESHOLD_PCT));
        assert!(!is_passing(0, 1, PASS_THRESHOLD_PCT));
        assert!(is_passing(1, 1, PASS_THRESHOLD_PCT));
    }

    #[test]
    fn pass_check_handles_huge_question_counts() {
        // The products would overflow u32; the comparison must not.
        assert!(is_passing(80_000_000, 100_000_000, PASS_THRESHOLD_PCT));
        assert!(!is_passing(60_000_000, 100_000_000, PASS_THRESHOLD_PCT));
        assert!(is_passing(u32::MAX, u32::MAX, PASS_THRESHOLD_PCT));
    }

    #[test]
    fn threshold_is_configurable() {
        assert!(is_passing(7, 10, 70));
        assert!(!is_passing(7, 10, 80));
        assert!(is_passing(8, 10, 80));
    }

    #[test]
    fn one_quiz_per_path() {
        let (db, user, path) = setup();
        generate_quiz(&db, &MockGenerator, &user, &path, 5).unwrap();
        let err = generate_quiz(&db, &MockGenerator, &user, &path, 5).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(ConflictError::QuizExists)));
    }

    #[test]
    fn quiz_questions_round_trip_through_storage() {
        let (db, user, path) = setup();
        let quiz = generate_quiz(&db, &MockGenerator, &user, &path, 3).unwrap();
        let stored = db.get_quiz_by_path(&path).unwrap().unwrap();
        assert_eq!(stored.questions, quiz.questions);
        assert_eq!(stored.questions.len(), 3);
    }

    #[test]
    fn attempt_validation_and_pass_flag() {
        let (db, user, path) = setup();
        let quiz = generate_quiz(&db, &MockGenerator, &user, &path, 10).unwrap();

        assert!(record_quiz_attempt(&db, &user, &quiz.id, 11, 10, PASS_THRESHOLD_PCT).is_err());
        assert!(record_quiz_attempt(&db, &user, &quiz.id, 1, 0, PASS_THRESHOLD_PCT).is_err());

        let passed = record_quiz_attempt(&db, &user, &quiz.id, 7, 10, PASS_THRESHOLD_PCT).unwrap();
        assert!(passed.passed);
        let failed = record_quiz_attempt(&db, &user, &quiz.id, 6, 10, PASS_THRESHOLD_PCT).unwrap();
        assert!(!failed.passed);

        assert_eq!(db.list_quiz_attempts(&quiz.id).unwrap().len(), 2);
    }

    #[test]
    fn attempt_credits_quiz_goals() {
        let (db, user, path) = setup();
        let quiz = generate_quiz(&db, &MockGenerator, &user, &path, 5).unwrap();
        let g = goal::create_goal(
            &db,
            &user,
            "Two quizzes",
            2,
            goal::GoalKind::Weekly,
            goal::GoalMetric::Quizzes,
        )
        .unwrap();

        record_quiz_attempt(&db, &user, &quiz.id, 3, 5, PASS_THRESHOLD_PCT).unwrap();
        record_quiz_attempt(&db, &user, &quiz.id, 4, 5, PASS_THRESHOLD_PCT).unwrap();

        let stored = db.get_goal(&g.id).unwrap().unwrap();
        assert_eq!(stored.progress, 2);
        assert!(stored.is_completed);
    }
}
