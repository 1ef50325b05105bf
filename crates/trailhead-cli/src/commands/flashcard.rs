//! Flashcard commands for CLI.

use clap::Subcommand;
use trailhead_core::ai::MockGenerator;
use trailhead_core::flashcard::{generate_flashcards, list_flashcards};
use trailhead_core::storage::Database;

use super::resolve_user;

#[derive(Subcommand)]
pub enum FlashcardAction {
    /// Generate (or regenerate) the deck for a path
    Generate {
        /// Path id
        path_id: String,
        /// Acting username
        #[arg(long)]
        user: String,
    },
    /// List the deck for a path
    List {
        /// Path id
        path_id: String,
    },
}

pub fn run(action: FlashcardAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        FlashcardAction::Generate { path_id, user } => {
            let actor = resolve_user(&db, &user)?;
            let cards = generate_flashcards(&db, &MockGenerator, &actor.id, &path_id)?;
            println!("Generated {} card(s)", cards.len());
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        FlashcardAction::List { path_id } => {
            let cards = list_flashcards(&db, &path_id)?;
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
    }
    Ok(())
}
