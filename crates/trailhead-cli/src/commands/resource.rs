//! Resource commands for CLI.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use trailhead_core::ai::{ContentGenerator, MockGenerator};
use trailhead_core::resource::{
    add_resource, complete_resource, delete_resource, set_summary, update_resource, ResourceKind,
    ResourceUpdate,
};
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum ResourceAction {
    /// Add a resource to a path
    Add {
        /// Path id
        path_id: String,
        /// Resource title
        title: String,
        /// Acting username
        #[arg(long)]
        user: String,
        /// article, video, book, course, text, ...
        #[arg(long)]
        kind: Option<String>,
        /// Link to the material
        #[arg(long)]
        url: Option<String>,
        /// Inline content instead of a link
        #[arg(long)]
        content: Option<String>,
    },
    /// List the resources in a path
    List {
        /// Path id
        path_id: String,
    },
    /// Edit a resource's fields
    Update {
        /// Resource id
        resource_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: Option<String>,
        /// article, video, book, course, text, ...
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Mark a resource complete (counts as study activity for today)
    Complete {
        /// Resource id
        resource_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
        /// Override the study day, ISO date
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a resource incomplete again
    Uncomplete {
        /// Resource id
        resource_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// Attach or clear a summary on a resource
    Summary {
        /// Resource id
        resource_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
        /// Summary text; omit together with --clear to remove it
        #[arg(long)]
        text: Option<String>,
        /// Generate the summary instead of providing text
        #[arg(long)]
        generate: bool,
        /// Remove the existing summary
        #[arg(long)]
        clear: bool,
    },
    /// Delete a resource
    Delete {
        /// Resource id
        resource_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: ResourceAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ResourceAction::Add {
            path_id,
            title,
            user,
            kind,
            url,
            content,
        } => {
            let actor = resolve_user(&db, &user)?;
            let kind = kind
                .as_deref()
                .map(ResourceKind::parse)
                .unwrap_or(ResourceKind::Article);
            let resource = add_resource(
                &db,
                &actor.id,
                &path_id,
                &title,
                kind,
                url.as_deref(),
                content.as_deref(),
            )?;
            println!("Resource added: {}", resource.id);
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        ResourceAction::List { path_id } => {
            let resources = db.list_resources(&path_id)?;
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
        ResourceAction::Update {
            resource_id,
            user,
            title,
            kind,
            url,
            content,
        } => {
            let actor = resolve_user(&db, &user)?;
            let update = ResourceUpdate {
                title,
                kind: kind.as_deref().map(ResourceKind::parse),
                url,
                content,
            };
            let resource = update_resource(&db, &actor.id, &resource_id, update)?;
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        ResourceAction::Complete {
            resource_id,
            user,
            date,
        } => {
            let actor = resolve_user(&db, &user)?;
            let today = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")?,
                None => Utc::now().date_naive(),
            };
            let outcome = complete_resource(&db, &actor.id, &resource_id, true, today)?;
            println!("Resource completed: {resource_id}");
            if let Some(streak) = outcome.streak {
                println!(
                    "Streak: {} day(s){}",
                    streak.streak_count,
                    if streak.advanced { " (advanced)" } else { "" }
                );
            }
            for goal in outcome.completed_goals {
                println!("Goal reached: {}", goal.title);
            }
        }
        ResourceAction::Uncomplete { resource_id, user } => {
            let actor = resolve_user(&db, &user)?;
            complete_resource(&db, &actor.id, &resource_id, false, Utc::now().date_naive())?;
            println!("Resource marked incomplete: {resource_id}");
        }
        ResourceAction::Summary {
            resource_id,
            user,
            text,
            generate,
            clear,
        } => {
            let actor = resolve_user(&db, &user)?;
            let summary = if generate {
                let resource = db
                    .get_resource(&resource_id)?
                    .ok_or_else(|| format!("no such resource: {resource_id}"))?;
                Some(MockGenerator.summarize(&resource))
            } else if clear {
                None
            } else {
                Some(text.ok_or("pass --text, --generate or --clear")?)
            };
            set_summary(&db, &actor.id, &resource_id, summary.as_deref())?;
            println!(
                "Summary {}",
                if summary.is_some() { "set" } else { "cleared" }
            );
        }
        ResourceAction::Delete { resource_id, user } => {
            let actor = resolve_user(&db, &user)?;
            delete_resource(&db, &actor.id, &resource_id)?;
            println!("Resource deleted: {resource_id}");
        }
    }
    Ok(())
}
