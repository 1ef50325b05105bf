//! Integration tests for the resource-completion flow.
//!
//! A completion drives the streak tracker and the goal progress engine in
//! one transaction; these tests exercise that chain end to end through
//! real storage.

use chrono::NaiveDate;
use trailhead_core::goal::{create_goal, GoalKind, GoalMetric};
use trailhead_core::identity::provision_user;
use trailhead_core::path::{create_path, Difficulty};
use trailhead_core::resource::{add_resource, complete_resource, ResourceKind};
use trailhead_core::storage::Database;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup_with_resources(count: usize) -> (Database, String, Vec<String>) {
    let db = Database::open_memory().unwrap();
    let user = provision_user(&db, "auth0|it", "iris", "iris@example.com", 3).unwrap();
    let path = create_path(&db, &user.id, "Operating systems", None, None, Difficulty::Advanced)
        .unwrap();
    let mut ids = Vec::new();
    for i in 0..count {
        let r = add_resource(
            &db,
            &user.id,
            &path.id,
            &format!("Chapter {i}"),
            ResourceKind::Book,
            Some(&format!("https://example.com/ch{i}")),
            None,
        )
        .unwrap();
        ids.push(r.id);
    }
    (db, user.id, ids)
}

#[test]
fn two_completions_same_day_count_once_for_the_streak() {
    let (db, user, resources) = setup_with_resources(2);
    let today = day("2026-03-10");

    let first = complete_resource(&db, &user, &resources[0], true, today).unwrap();
    assert_eq!(first.streak.unwrap().streak_count, 1);

    let second = complete_resource(&db, &user, &resources[1], true, today).unwrap();
    let update = second.streak.unwrap();
    assert_eq!(update.streak_count, 1);
    assert!(!update.advanced);

    assert_eq!(db.get_user(&user).unwrap().unwrap().streak_count, 1);
}

#[test]
fn consecutive_days_grow_the_streak_and_gaps_reset_it() {
    let (db, user, resources) = setup_with_resources(3);

    complete_resource(&db, &user, &resources[0], true, day("2026-03-10")).unwrap();
    complete_resource(&db, &user, &resources[1], true, day("2026-03-11")).unwrap();
    assert_eq!(db.get_user(&user).unwrap().unwrap().streak_count, 2);

    // Two-day gap: back to 1.
    complete_resource(&db, &user, &resources[2], true, day("2026-03-14")).unwrap();
    let stored = db.get_user(&user).unwrap().unwrap();
    assert_eq!(stored.streak_count, 1);
    assert_eq!(stored.last_study_date, Some(day("2026-03-14")));
}

#[test]
fn completions_drive_resource_goals_to_the_latch() {
    let (db, user, resources) = setup_with_resources(3);
    let goal = create_goal(&db, &user, "Two chapters", 2, GoalKind::Daily, GoalMetric::Resources)
        .unwrap();

    complete_resource(&db, &user, &resources[0], true, day("2026-03-10")).unwrap();
    assert_eq!(db.get_goal(&goal.id).unwrap().unwrap().progress, 1);

    let outcome = complete_resource(&db, &user, &resources[1], true, day("2026-03-10")).unwrap();
    assert_eq!(outcome.completed_goals.len(), 1);
    assert_eq!(outcome.completed_goals[0].id, goal.id);

    // A third completion leaves the finished goal at its target.
    complete_resource(&db, &user, &resources[2], true, day("2026-03-10")).unwrap();
    let stored = db.get_goal(&goal.id).unwrap().unwrap();
    assert_eq!(stored.progress, 2);
    assert!(stored.is_completed);
}

#[test]
fn no_retroactive_credit_for_goals_created_after_the_fact() {
    let (db, user, resources) = setup_with_resources(2);

    complete_resource(&db, &user, &resources[0], true, day("2026-03-10")).unwrap();
    let goal = create_goal(&db, &user, "Late goal", 2, GoalKind::Weekly, GoalMetric::Resources)
        .unwrap();
    // Only events after creation count.
    assert_eq!(db.get_goal(&goal.id).unwrap().unwrap().progress, 0);

    complete_resource(&db, &user, &resources[1], true, day("2026-03-10")).unwrap();
    assert_eq!(db.get_goal(&goal.id).unwrap().unwrap().progress, 1);
}

#[test]
fn uncompletion_triggers_neither_streak_nor_goals() {
    let (db, user, resources) = setup_with_resources(1);
    let goal = create_goal(&db, &user, "Goal", 5, GoalKind::Daily, GoalMetric::Resources).unwrap();

    complete_resource(&db, &user, &resources[0], true, day("2026-03-10")).unwrap();
    complete_resource(&db, &user, &resources[0], false, day("2026-03-11")).unwrap();

    let stored_goal = db.get_goal(&goal.id).unwrap().unwrap();
    assert_eq!(stored_goal.progress, 1);
    let stored_user = db.get_user(&user).unwrap().unwrap();
    assert_eq!(stored_user.last_study_date, Some(day("2026-03-10")));
}
