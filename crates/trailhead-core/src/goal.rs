//! User goals and the progress engine.
//!
//! A goal counts qualifying events (resource completions or quiz attempts)
//! toward a fixed target. Progress only ever moves forward while the goal
//! is active, and completion is a one-way latch: once `is_completed` is set
//! the goal is excluded from every later increment, even if more qualifying
//! events arrive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};
use crate::storage::Database;

/// Period a goal is framed over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Daily,
    Weekly,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Daily => "daily",
            GoalKind::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> GoalKind {
        match s {
            "weekly" => GoalKind::Weekly,
            _ => GoalKind::Daily,
        }
    }
}

/// Which events count toward the goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalMetric {
    /// Resource completions
    Resources,
    /// Quiz attempts
    Quizzes,
}

impl GoalMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalMetric::Resources => "resources",
            GoalMetric::Quizzes => "quizzes",
        }
    }

    pub fn parse(s: &str) -> GoalMetric {
        match s {
            "quizzes" => GoalMetric::Quizzes,
            _ => GoalMetric::Resources,
        }
    }
}

/// A user-defined target count of qualifying events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Immutable after creation
    pub target: u32,
    /// Monotone while the goal is active
    pub progress: u32,
    pub kind: GoalKind,
    pub metric: GoalMetric,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

const MAX_GOAL_TITLE_LEN: usize = 120;

/// Create a new goal with zero progress.
///
/// # Errors
/// Returns a validation error for an empty title or a target below 1.
pub fn create_goal(
    db: &Database,
    user_id: &str,
    title: &str,
    target: u32,
    kind: GoalKind,
    metric: GoalMetric,
) -> Result<Goal> {
    if title.trim().is_empty() {
        return Err(ValidationError::Empty { field: "title" }.into());
    }
    if title.len() > MAX_GOAL_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            len: title.len(),
            max: MAX_GOAL_TITLE_LEN,
        }
        .into());
    }
    if target == 0 {
        return Err(ValidationError::OutOfRange {
            field: "target",
            message: "target must be at least 1".to_string(),
        }
        .into());
    }

    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        target,
        progress: 0,
        kind,
        metric,
        is_completed: false,
        created_at: Utc::now(),
    };
    db.insert_goal(&goal)?;
    Ok(goal)
}

/// Credit one qualifying event to every active goal with a matching metric.
///
/// Completed goals are skipped entirely. Runs against whatever transaction
/// is open on the connection; callers wrap the triggering event and this
/// credit in one transaction so concurrent completions cannot double-count.
///
/// Returns the goals that reached their target on this event.
pub fn record_goal_progress(
    db: &Database,
    user_id: &str,
    metric: GoalMetric,
) -> Result<Vec<Goal>> {
    let mut newly_completed = Vec::new();
    for mut goal in db.active_goals(user_id, metric)? {
        goal.progress += 1;
        goal.is_completed = goal.progress >= goal.target;
        db.update_goal_progress(&goal.id, goal.progress, goal.is_completed)?;
        if goal.is_completed {
            newly_completed.push(goal);
        }
    }
    Ok(newly_completed)
}

/// Delete a goal. Owner-checked.
pub fn delete_goal(db: &Database, user_id: &str, goal_id: &str) -> Result<()> {
    let goal = db.get_goal(goal_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "goal",
        id: goal_id.to_string(),
    })?;
    if goal.user_id != user_id {
        return Err(CoreError::Forbidden(
            "goal belongs to another user".to_string(),
        ));
    }
    db.delete_goal(goal_id)?;
    Ok(())
}
