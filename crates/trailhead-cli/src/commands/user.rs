//! User account commands for CLI.

use clap::Subcommand;
use trailhead_core::identity::{provision_user, set_daily_goal, set_privacy};
use trailhead_core::storage::{Config, Database};

use super::resolve_user;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create or refresh a user from an external identity
    Provision {
        /// Identity provider subject id
        external_id: String,
        /// Username
        username: String,
        /// Email address
        email: String,
    },
    /// Show a user's profile
    Show {
        /// Username
        username: String,
    },
    /// Flip a profile between public and private
    Privacy {
        /// Username
        username: String,
        /// true for private, false for public
        private: bool,
    },
    /// Set the target resource completions per day
    DailyGoal {
        /// Username
        username: String,
        /// Completions per day
        target: u32,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        UserAction::Provision {
            external_id,
            username,
            email,
        } => {
            let daily_goal = Config::load()?.study.default_daily_goal;
            let user = provision_user(&db, &external_id, &username, &email, daily_goal)?;
            println!("User provisioned: {}", user.id);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::Show { username } => {
            let user = resolve_user(&db, &username)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UserAction::Privacy { username, private } => {
            let user = resolve_user(&db, &username)?;
            set_privacy(&db, &user.id, private)?;
            println!(
                "Profile for {} is now {}",
                user.username,
                if private { "private" } else { "public" }
            );
        }
        UserAction::DailyGoal { username, target } => {
            let user = resolve_user(&db, &username)?;
            set_daily_goal(&db, &user.id, target)?;
            println!("Daily goal for {} set to {target}", user.username);
        }
    }
    Ok(())
}
