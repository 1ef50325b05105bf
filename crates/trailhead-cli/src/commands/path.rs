//! Learning path commands for CLI.

use clap::Subcommand;
use trailhead_core::path::{
    clone_path, create_path, delete_path, update_path, Difficulty, PathUpdate,
};
use trailhead_core::social::toggle_star;
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum PathAction {
    /// Create a new private path
    Create {
        /// Path title
        title: String,
        /// Acting username
        #[arg(long)]
        user: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Category label
        #[arg(long)]
        category: Option<String>,
        /// beginner, intermediate or advanced
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// List the acting user's paths
    List {
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// List every public path
    Browse,
    /// Show one path and its resources
    Show {
        /// Path id
        path_id: String,
    },
    /// Update a path's metadata or visibility
    Update {
        /// Path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// beginner, intermediate or advanced
        #[arg(long)]
        difficulty: Option<String>,
        /// Set visibility: true publishes, false unpublishes
        #[arg(long)]
        public: Option<bool>,
    },
    /// Clone a public path into the acting user's collection
    Clone {
        /// Source path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Delete a path and everything in it
    Delete {
        /// Path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Star or unstar a path
    Star {
        /// Path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: PathAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PathAction::Create {
            title,
            user,
            description,
            category,
            difficulty,
        } => {
            let actor = resolve_user(&db, &user)?;
            let difficulty = difficulty
                .as_deref()
                .map(Difficulty::parse)
                .unwrap_or_default();
            let path = create_path(
                &db,
                &actor.id,
                &title,
                description.as_deref(),
                category.as_deref(),
                difficulty,
            )?;
            println!("Path created: {}", path.id);
            println!("{}", serde_json::to_string_pretty(&path)?);
        }
        PathAction::List { user } => {
            let actor = resolve_user(&db, &user)?;
            let paths = db.list_paths_by_owner(&actor.id)?;
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
        PathAction::Browse => {
            let paths = db.list_public_paths()?;
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
        PathAction::Show { path_id } => {
            let path = db
                .get_path(&path_id)?
                .ok_or_else(|| format!("no such path: {path_id}"))?;
            println!("{}", serde_json::to_string_pretty(&path)?);
            let resources = db.list_resources(&path_id)?;
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
        PathAction::Update {
            path_id,
            user,
            title,
            description,
            category,
            difficulty,
            public,
        } => {
            let actor = resolve_user(&db, &user)?;
            let update = PathUpdate {
                title,
                description,
                category,
                difficulty: difficulty.as_deref().map(Difficulty::parse),
                is_public: public,
            };
            let path = update_path(&db, &actor.id, &path_id, update)?;
            println!("{}", serde_json::to_string_pretty(&path)?);
        }
        PathAction::Clone { path_id, user } => {
            let actor = resolve_user(&db, &user)?;
            let clone = clone_path(&db, &actor.id, &path_id)?;
            println!("Path cloned: {}", clone.id);
            println!("{}", serde_json::to_string_pretty(&clone)?);
        }
        PathAction::Delete { path_id, user } => {
            let actor = resolve_user(&db, &user)?;
            delete_path(&db, &actor.id, &path_id)?;
            println!("Path deleted: {path_id}");
        }
        PathAction::Star { path_id, user } => {
            let actor = resolve_user(&db, &user)?;
            let starred = toggle_star(&db, &actor.id, &path_id)?;
            println!(
                "Path {path_id} is now {}",
                if starred { "starred" } else { "unstarred" }
            );
        }
    }
    Ok(())
}
