//! Flashcard review content.
//!
//! Cards are generated per path through the same [`ContentGenerator`] seam
//! as quizzes. Regeneration replaces the existing deck.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::ContentGenerator;
use crate::error::Result;
use crate::path::require_owned_path;
use crate::storage::Database;

/// A single front/back review card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub path_id: String,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

/// Generate (or regenerate) the flashcard deck for a path. Owner-checked.
pub fn generate_flashcards(
    db: &Database,
    generator: &dyn ContentGenerator,
    actor_id: &str,
    path_id: &str,
) -> Result<Vec<Flashcard>> {
    let path = require_owned_path(db, actor_id, path_id)?;
    let resources = db.list_resources(path_id)?;

    let tx = db.conn().unchecked_transaction()?;

    db.delete_flashcards(path_id)?;
    let now = Utc::now();
    let cards: Vec<Flashcard> = generator
        .generate_flashcards(&path.title, &resources)
        .into_iter()
        .map(|(front, back)| Flashcard {
            id: Uuid::new_v4().to_string(),
            path_id: path_id.to_string(),
            front,
            back,
            created_at: now,
        })
        .collect();
    for card in &cards {
        db.insert_flashcard(card)?;
    }

    tx.commit()?;
    Ok(cards)
}

/// List the deck for a path.
pub fn list_flashcards(db: &Database, path_id: &str) -> Result<Vec<Flashcard>> {
    Ok(db.list_flashcards(path_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockGenerator;
    use crate::identity::provision_user;
    use crate::path::{create_path, Difficulty};
    use crate::resource::{add_resource, ResourceKind};

    #[test]
    fn regeneration_replaces_the_deck() {
        let db = Database::open_memory().unwrap();
        let user = provision_user(&db, "auth0|f", "finn", "finn@example.com", 3).unwrap();
        let path = create_path(&db, &user.id, "Networking", None, None, Difficulty::Beginner)
            .unwrap();
        add_resource(&db, &user.id, &path.id, "OSI model", ResourceKind::Article, Some("https://a"), None)
            .unwrap();
        add_resource(&db, &user.id, &path.id, "TCP deep dive", ResourceKind::Video, Some("https://b"), None)
            .unwrap();

        let first = generate_flashcards(&db, &MockGenerator, &user.id, &path.id).unwrap();
        assert_eq!(first.len(), 2);

        let second = generate_flashcards(&db, &MockGenerator, &user.id, &path.id).unwrap();
        assert_eq!(list_flashcards(&db, &path.id).unwrap().len(), second.len());
        assert_ne!(first[0].id, second[0].id);
    }
}
