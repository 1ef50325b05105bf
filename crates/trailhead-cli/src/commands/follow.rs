//! Follow commands for CLI.

use clap::Subcommand;
use trailhead_core::social::{accept_follow_request, decline_follow_request, toggle_follow};
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum FollowAction {
    /// Follow, request to follow, or undo either
    Toggle {
        /// Target username
        target: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Accept a pending follow request
    Accept {
        /// Username of the requester
        follower: String,
        /// Id of the request notification
        notification_id: String,
        /// Acting username (request recipient)
        #[arg(long)]
        user: String,
    },
    /// Decline a pending follow request
    Decline {
        /// Username of the requester
        follower: String,
        /// Id of the request notification
        notification_id: String,
        /// Acting username (request recipient)
        #[arg(long)]
        user: String,
    },
    /// List who follows the acting user
    Followers {
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// List who the acting user follows
    Following {
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: FollowAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        FollowAction::Toggle { target, user } => {
            let actor = resolve_user(&db, &user)?;
            let target_user = resolve_user(&db, &target)?;
            let following = toggle_follow(&db, &actor.id, &target_user.id)?;
            if following {
                let relation = db.get_follow(&actor.id, &target_user.id)?;
                let pending = relation.map(|f| !f.is_accepted).unwrap_or(false);
                println!(
                    "{} {} {}",
                    actor.username,
                    if pending {
                        "requested to follow"
                    } else {
                        "now follows"
                    },
                    target_user.username
                );
            } else {
                println!("{} no longer follows {}", actor.username, target_user.username);
            }
        }
        FollowAction::Accept {
            follower,
            notification_id,
            user,
        } => {
            let actor = resolve_user(&db, &user)?;
            let follower_user = resolve_user(&db, &follower)?;
            accept_follow_request(&db, &actor.id, &follower_user.id, &notification_id)?;
            println!("Accepted follow request from {}", follower_user.username);
        }
        FollowAction::Decline {
            follower,
            notification_id,
            user,
        } => {
            let actor = resolve_user(&db, &user)?;
            let follower_user = resolve_user(&db, &follower)?;
            decline_follow_request(&db, &actor.id, &follower_user.id, &notification_id)?;
            println!("Declined follow request from {}", follower_user.username);
        }
        FollowAction::Followers { user } => {
            let actor = resolve_user(&db, &user)?;
            let followers = db.list_followers(&actor.id)?;
            println!("{}", serde_json::to_string_pretty(&followers)?);
        }
        FollowAction::Following { user } => {
            let actor = resolve_user(&db, &user)?;
            let following = db.list_following(&actor.id)?;
            println!("{}", serde_json::to_string_pretty(&following)?);
        }
    }
    Ok(())
}
