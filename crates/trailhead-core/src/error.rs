//! Core error types for trailhead-core.
//!
//! Every business operation surfaces failures through [`CoreError`], which
//! splits into the four families callers care about: validation, state
//! conflicts, missing records, and authorization. Infrastructure failures
//! (database, config, serialization) wrap their own error enums.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for trailhead-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation would violate a domain invariant
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Acting user does not own the target record
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors, raised before any write happens.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required field is empty
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },

    /// Field exceeds its length limit
    #[error("'{field}' is too long: {len} characters (max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// Numeric field outside its allowed range
    #[error("Invalid value for '{field}': {message}")]
    OutOfRange { field: &'static str, message: String },

    /// Quiz score inconsistent with question count
    #[error("Invalid quiz score: {score} out of {total}")]
    InvalidScore { score: u32, total: u32 },

    /// A resource needs either a URL or inline content
    #[error("Resource needs a URL or inline content")]
    MissingResourceBody,
}

/// State-conflict errors: the operation contradicts a domain invariant.
#[derive(Error, Debug)]
pub enum ConflictError {
    /// Users cannot follow themselves
    #[error("You cannot follow yourself")]
    SelfFollow,

    /// Follow request was already accepted
    #[error("Follow request from {follower_id} is already accepted")]
    AlreadyAccepted { follower_id: String },

    /// A cloned path must be changed before it can go public
    #[error("A cloned path must be modified before it can be made public. Edit the path details or change its resources first.")]
    UnmodifiedClone,

    /// Cloning your own path is not allowed
    #[error("You already own this path")]
    CloneOwnPath,

    /// At most one clone of a source path per user
    #[error("You already have a clone of this path")]
    DuplicateClone,

    /// At most one quiz per path
    #[error("This path already has a quiz")]
    QuizExists,
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(DatabaseError::from(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
