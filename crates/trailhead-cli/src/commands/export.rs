//! Data export command for CLI.

use trailhead_core::export::export_user_data_json;
use trailhead_core::storage::Database;

use super::resolve_user;

pub fn run(user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let actor = resolve_user(&db, user)?;
    println!("{}", export_user_data_json(&db, &actor.id)?);
    Ok(())
}
