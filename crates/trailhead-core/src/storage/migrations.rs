//! Database schema migrations for trailhead.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: Initial schema.
///
/// Creates the relational core: users, learning paths, resources, quizzes,
/// quiz attempts, goals, follows, notifications, and path stars.
///
/// Conventions:
/// - TEXT UUID primary keys on domain rows
/// - RFC 3339 TEXT timestamps, `%Y-%m-%d` TEXT for day-granularity dates
/// - booleans as INTEGER 0/1
/// - `cloned_from` is a lookup-only reference (no FK), so a source path can
///   be deleted without touching its clones
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            external_id     TEXT NOT NULL UNIQUE,
            username        TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            is_private      INTEGER NOT NULL DEFAULT 0,
            streak_count    INTEGER NOT NULL DEFAULT 0,
            last_study_date TEXT,
            daily_goal      INTEGER NOT NULL DEFAULT 3,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS paths (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT,
            category    TEXT,
            difficulty  TEXT NOT NULL DEFAULT 'beginner',
            is_public   INTEGER NOT NULL DEFAULT 0,
            is_modified INTEGER NOT NULL DEFAULT 0,
            cloned_from TEXT,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS resources (
            id           TEXT PRIMARY KEY,
            path_id      TEXT NOT NULL REFERENCES paths(id) ON DELETE CASCADE,
            title        TEXT NOT NULL,
            kind         TEXT NOT NULL,
            url          TEXT,
            content      TEXT,
            summary      TEXT,
            is_completed INTEGER NOT NULL DEFAULT 0,
            position     INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quizzes (
            id         TEXT PRIMARY KEY,
            path_id    TEXT NOT NULL UNIQUE REFERENCES paths(id) ON DELETE CASCADE,
            questions  TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quiz_attempts (
            id              TEXT PRIMARY KEY,
            quiz_id         TEXT NOT NULL REFERENCES quizzes(id) ON DELETE CASCADE,
            user_id         TEXT NOT NULL REFERENCES users(id),
            score           INTEGER NOT NULL,
            total_questions INTEGER NOT NULL,
            passed          INTEGER NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS goals (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL REFERENCES users(id),
            title        TEXT NOT NULL,
            target       INTEGER NOT NULL,
            progress     INTEGER NOT NULL DEFAULT 0,
            kind         TEXT NOT NULL,
            metric       TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS follows (
            follower_id  TEXT NOT NULL REFERENCES users(id),
            following_id TEXT NOT NULL REFERENCES users(id),
            is_accepted  INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL,
            PRIMARY KEY (follower_id, following_id)
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id),
            kind       TEXT NOT NULL,
            actor_id   TEXT,
            path_id    TEXT,
            is_read    INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS path_stars (
            user_id    TEXT NOT NULL REFERENCES users(id),
            path_id    TEXT NOT NULL REFERENCES paths(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, path_id)
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: Add flashcards.
///
/// Review cards generated per path, stored alongside the quiz content.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS flashcards (
            id         TEXT PRIMARY KEY,
            path_id    TEXT NOT NULL REFERENCES paths(id) ON DELETE CASCADE,
            front      TEXT NOT NULL,
            back       TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: Indexes for the hot query paths.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_paths_owner ON paths(owner_id);
         CREATE INDEX IF NOT EXISTS idx_resources_path ON resources(path_id);
         CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at);
         CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id);
         CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);
         CREATE INDEX IF NOT EXISTS idx_attempts_quiz ON quiz_attempts(quiz_id);",
    )?;

    set_schema_version(&tx, 3)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 3);
    }
}
