//! Goal commands for CLI.

use clap::Subcommand;
use trailhead_core::goal::{create_goal, delete_goal, GoalKind, GoalMetric};
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Create {
        /// Goal title
        title: String,
        /// Target count of qualifying events
        target: u32,
        /// Acting username
        #[arg(long)]
        user: String,
        /// daily or weekly
        #[arg(long, default_value = "daily")]
        kind: String,
        /// resources or quizzes
        #[arg(long, default_value = "resources")]
        metric: String,
    },
    /// List the acting user's goals
    List {
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Delete a goal
    Delete {
        /// Goal id
        goal_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Create {
            title,
            target,
            user,
            kind,
            metric,
        } => {
            let actor = resolve_user(&db, &user)?;
            let goal = create_goal(
                &db,
                &actor.id,
                &title,
                target,
                GoalKind::parse(&kind),
                GoalMetric::parse(&metric),
            )?;
            println!("Goal created: {}", goal.id);
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List { user } => {
            let actor = resolve_user(&db, &user)?;
            let goals = db.list_goals(&actor.id)?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Delete { goal_id, user } => {
            let actor = resolve_user(&db, &user)?;
            delete_goal(&db, &actor.id, &goal_id)?;
            println!("Goal deleted: {goal_id}");
        }
    }
    Ok(())
}
