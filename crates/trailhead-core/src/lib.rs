//! # Trailhead Core Library
//!
//! This library provides the business logic for Trailhead, a tracker for
//! self-directed learning paths. All operations are available through a
//! standalone CLI binary; any richer front-end is a thin layer over the
//! same core library.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite-based relational store (users, paths, resources,
//!   quizzes, goals, follows, notifications, stars) plus TOML configuration
//! - **Domain modules**: each business rule lives beside its types --
//!   streak arithmetic, goal progress, the follow/privacy state machine,
//!   and the clone/publish gate
//! - **Generation**: quiz, flashcard, and summary content comes through the
//!   [`ContentGenerator`] seam; the shipped implementation is a
//!   deterministic mock
//!
//! ## Key Components
//!
//! - [`Database`]: the relational store, one connection per process
//! - [`streak::advance`]: pure daily-streak transition function
//! - [`social::toggle_follow`]: follow/unfollow/request in one operation
//! - [`path::clone_path`] and [`path::update_path`]: clone with the
//!   modify-before-republish gate

pub mod ai;
pub mod error;
pub mod export;
pub mod flashcard;
pub mod goal;
pub mod identity;
pub mod notification;
pub mod path;
pub mod quiz;
pub mod resource;
pub mod social;
pub mod storage;
pub mod streak;

pub use ai::{ContentGenerator, MockGenerator};
pub use error::{ConfigError, ConflictError, CoreError, DatabaseError, ValidationError};
pub use export::{export_user_data, export_user_data_json, UserExport};
pub use flashcard::Flashcard;
pub use goal::{Goal, GoalKind, GoalMetric};
pub use identity::User;
pub use notification::{Notification, NotificationKind};
pub use path::{Difficulty, LearningPath, PathUpdate};
pub use quiz::{Quiz, QuizAttempt, QuizQuestion};
pub use resource::{Resource, ResourceKind, ResourceUpdate};
pub use social::{Follow, PathStar};
pub use storage::{Config, Database};
pub use streak::StreakUpdate;
