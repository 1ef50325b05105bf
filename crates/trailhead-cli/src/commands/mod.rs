//! Command implementations for the Trailhead CLI.

pub mod config;
pub mod export;
pub mod flashcard;
pub mod follow;
pub mod goal;
pub mod notify;
pub mod path;
pub mod quiz;
pub mod resource;
pub mod user;

use trailhead_core::identity::User;
use trailhead_core::storage::Database;

/// Resolve an acting username to its user record.
pub fn resolve_user(db: &Database, username: &str) -> Result<User, Box<dyn std::error::Error>> {
    Ok(db
        .get_user_by_username(username)?
        .ok_or_else(|| format!("no such user: {username}"))?)
}
