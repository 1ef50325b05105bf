//! Notification feed commands for CLI.

use clap::Subcommand;
use trailhead_core::notification::{list_feed, mark_all_read, mark_read, unread_count};
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Show the feed, newest first
    List {
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Mark one notification read
    Read {
        /// Notification id
        notification_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Mark every notification read
    ReadAll {
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Show the unread count
    Unread {
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        NotifyAction::List { user } => {
            let actor = resolve_user(&db, &user)?;
            let feed = list_feed(&db, &actor.id)?;
            println!("{}", serde_json::to_string_pretty(&feed)?);
        }
        NotifyAction::Read {
            notification_id,
            user,
        } => {
            let actor = resolve_user(&db, &user)?;
            mark_read(&db, &actor.id, &notification_id)?;
            println!("Notification read: {notification_id}");
        }
        NotifyAction::ReadAll { user } => {
            let actor = resolve_user(&db, &user)?;
            mark_all_read(&db, &actor.id)?;
            println!("All notifications read");
        }
        NotifyAction::Unread { user } => {
            let actor = resolve_user(&db, &user)?;
            println!("{}", unread_count(&db, &actor.id)?);
        }
    }
    Ok(())
}
