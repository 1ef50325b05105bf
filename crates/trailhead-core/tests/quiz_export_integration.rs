//! Integration tests for quiz attempts and the full data export.

use trailhead_core::ai::MockGenerator;
use trailhead_core::goal::{create_goal, GoalKind, GoalMetric};
use trailhead_core::identity::provision_user;
use trailhead_core::path::{create_path, Difficulty};
use trailhead_core::quiz::{generate_quiz, record_quiz_attempt, PASS_THRESHOLD_PCT};
use trailhead_core::resource::{add_resource, ResourceKind};
use trailhead_core::social::toggle_follow;
use trailhead_core::storage::Database;
use trailhead_core::export::export_user_data_json;

#[test]
fn pass_flag_sits_exactly_on_the_seventy_percent_line() {
    let db = Database::open_memory().unwrap();
    let user = provision_user(&db, "auth0|p", "pat", "pat@example.com", 3).unwrap();
    let path = create_path(&db, &user.id, "Statistics", None, None, Difficulty::Beginner).unwrap();
    let quiz = generate_quiz(&db, &MockGenerator, &user.id, &path.id, 10).unwrap();

    let at_line = record_quiz_attempt(&db, &user.id, &quiz.id, 7, 10, PASS_THRESHOLD_PCT).unwrap();
    assert!(at_line.passed);
    let below = record_quiz_attempt(&db, &user.id, &quiz.id, 6, 10, PASS_THRESHOLD_PCT).unwrap();
    assert!(!below.passed);

    // Attempts are immutable history: both remain.
    let attempts = db.list_quiz_attempts(&quiz.id).unwrap();
    assert_eq!(attempts.len(), 2);
}

#[test]
fn quiz_attempts_credit_quiz_goals_but_not_resource_goals() {
    let db = Database::open_memory().unwrap();
    let user = provision_user(&db, "auth0|p", "pat", "pat@example.com", 3).unwrap();
    let path = create_path(&db, &user.id, "Statistics", None, None, Difficulty::Beginner).unwrap();
    let quiz = generate_quiz(&db, &MockGenerator, &user.id, &path.id, 5).unwrap();

    let quiz_goal =
        create_goal(&db, &user.id, "One quiz", 1, GoalKind::Daily, GoalMetric::Quizzes).unwrap();
    let res_goal =
        create_goal(&db, &user.id, "One resource", 1, GoalKind::Daily, GoalMetric::Resources)
            .unwrap();

    record_quiz_attempt(&db, &user.id, &quiz.id, 5, 5, PASS_THRESHOLD_PCT).unwrap();

    assert!(db.get_goal(&quiz_goal.id).unwrap().unwrap().is_completed);
    assert_eq!(db.get_goal(&res_goal.id).unwrap().unwrap().progress, 0);
}

#[test]
fn export_is_a_complete_self_describing_document() {
    let db = Database::open_memory().unwrap();
    let user = provision_user(&db, "auth0|e", "elle", "elle@example.com", 3).unwrap();
    let friend = provision_user(&db, "auth0|f", "fay", "fay@example.com", 3).unwrap();

    let path = create_path(&db, &user.id, "Haskell", None, Some("fp"), Difficulty::Advanced)
        .unwrap();
    add_resource(&db, &user.id, &path.id, "LYAH", ResourceKind::Book, Some("https://lyah"), None)
        .unwrap();
    let quiz = generate_quiz(&db, &MockGenerator, &user.id, &path.id, 4).unwrap();
    record_quiz_attempt(&db, &user.id, &quiz.id, 3, 4, PASS_THRESHOLD_PCT).unwrap();
    create_goal(&db, &user.id, "Ship it", 10, GoalKind::Weekly, GoalMetric::Resources).unwrap();
    toggle_follow(&db, &user.id, &friend.id).unwrap();
    toggle_follow(&db, &friend.id, &user.id).unwrap();

    let json = export_user_data_json(&db, &user.id).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(doc["user"]["email"], "elle@example.com");
    assert_eq!(doc["paths"][0]["title"], "Haskell");
    assert_eq!(doc["paths"][0]["quiz_attempts"][0]["score"], 3);
    assert_eq!(doc["goals"].as_array().unwrap().len(), 1);
    assert_eq!(doc["following"].as_array().unwrap().len(), 1);
    assert_eq!(doc["followers"].as_array().unwrap().len(), 1);
    // The inbound follow produced a notification for the exporting user.
    assert!(!doc["notifications"].as_array().unwrap().is_empty());
}
