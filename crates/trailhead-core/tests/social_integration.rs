//! Integration tests for the follow/privacy workflow and path stars.

use trailhead_core::identity::{provision_user, set_privacy};
use trailhead_core::notification::{unread_count, NotificationKind};
use trailhead_core::path::{create_path, update_path, Difficulty, PathUpdate};
use trailhead_core::social::{
    accept_follow_request, decline_follow_request, toggle_follow, toggle_star,
};
use trailhead_core::storage::Database;

fn two_users(db: &Database) -> (String, String) {
    let a = provision_user(db, "auth0|a", "ana", "ana@example.com", 3).unwrap();
    let b = provision_user(db, "auth0|b", "ben", "ben@example.com", 3).unwrap();
    (a.id, b.id)
}

#[test]
fn full_request_accept_cycle_against_a_private_profile() {
    let db = Database::open_memory().unwrap();
    let (follower, target) = two_users(&db);
    set_privacy(&db, &target, true).unwrap();

    assert!(toggle_follow(&db, &follower, &target).unwrap());
    assert!(!db.get_follow(&follower, &target).unwrap().unwrap().is_accepted);

    let request = db.list_notifications(&target).unwrap().remove(0);
    assert_eq!(request.kind, NotificationKind::RequestFollow);
    assert_eq!(request.actor_id.as_deref(), Some(follower.as_str()));

    accept_follow_request(&db, &target, &follower, &request.id).unwrap();

    // Relation accepted, request rewritten, follower notified.
    assert!(db.get_follow(&follower, &target).unwrap().unwrap().is_accepted);
    let rewritten = db.get_notification(&request.id).unwrap().unwrap();
    assert_eq!(rewritten.kind, NotificationKind::RequestAccepted);
    assert!(rewritten.is_read);
    let follower_feed = db.list_notifications(&follower).unwrap();
    assert_eq!(follower_feed[0].kind, NotificationKind::FollowAccepted);

    // Unfollow afterwards tears the accepted relation down.
    assert!(!toggle_follow(&db, &follower, &target).unwrap());
    assert!(db.get_follow(&follower, &target).unwrap().is_none());
}

#[test]
fn withdrawing_a_pending_request_uses_the_same_toggle() {
    let db = Database::open_memory().unwrap();
    let (follower, target) = two_users(&db);
    set_privacy(&db, &target, true).unwrap();

    toggle_follow(&db, &follower, &target).unwrap();
    assert!(!toggle_follow(&db, &follower, &target).unwrap());
    assert!(db.get_follow(&follower, &target).unwrap().is_none());
}

#[test]
fn decline_removes_every_trace_of_the_request() {
    let db = Database::open_memory().unwrap();
    let (follower, target) = two_users(&db);
    set_privacy(&db, &target, true).unwrap();

    toggle_follow(&db, &follower, &target).unwrap();
    let request_id = db.list_notifications(&target).unwrap()[0].id.clone();

    decline_follow_request(&db, &target, &follower, &request_id).unwrap();
    assert!(db.get_follow(&follower, &target).unwrap().is_none());
    assert!(db.get_notification(&request_id).unwrap().is_none());
    assert_eq!(unread_count(&db, &target).unwrap(), 0);

    // The follower can ask again from a clean slate.
    assert!(toggle_follow(&db, &follower, &target).unwrap());
}

#[test]
fn starring_notifies_the_owner_and_unstarring_is_silent() {
    let db = Database::open_memory().unwrap();
    let (owner, fan) = two_users(&db);
    let path = create_path(&db, &owner, "Rust in practice", None, None, Difficulty::Beginner)
        .unwrap();
    update_path(
        &db,
        &owner,
        &path.id,
        PathUpdate {
            is_public: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(toggle_star(&db, &fan, &path.id).unwrap());
    let feed = db.list_notifications(&owner).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].kind, NotificationKind::Star);
    assert_eq!(feed[0].path_id.as_deref(), Some(path.id.as_str()));

    assert!(!toggle_star(&db, &fan, &path.id).unwrap());
    assert!(db.get_star(&fan, &path.id).unwrap().is_none());
    // No second notification for the unstar.
    assert_eq!(db.list_notifications(&owner).unwrap().len(), 1);
}

#[test]
fn starring_own_path_emits_no_notification() {
    let db = Database::open_memory().unwrap();
    let (owner, _) = two_users(&db);
    let path = create_path(&db, &owner, "Notes", None, None, Difficulty::Beginner).unwrap();

    assert!(toggle_star(&db, &owner, &path.id).unwrap());
    assert!(db.list_notifications(&owner).unwrap().is_empty());
}

#[test]
fn starring_a_private_path_of_someone_else_is_forbidden() {
    let db = Database::open_memory().unwrap();
    let (owner, fan) = two_users(&db);
    let path = create_path(&db, &owner, "Hidden", None, None, Difficulty::Beginner).unwrap();

    assert!(toggle_star(&db, &fan, &path.id).is_err());
}
