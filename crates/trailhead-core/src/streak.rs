//! Daily study streak tracking.
//!
//! The streak advances at day granularity: completing at least one resource
//! on consecutive calendar days grows it, a gap resets it, and repeated
//! completions within one day are idempotent. The transition itself is a
//! total pure function so the date arithmetic can be tested without a
//! database; [`record_study_activity`] applies it to the stored user row.

use chrono::NaiveDate;

use crate::error::{CoreError, Result};
use crate::storage::Database;

/// Outcome of advancing the streak for one study day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// New consecutive-day count
    pub streak_count: u32,
    /// True if the count changed (first completion of the day)
    pub advanced: bool,
}

/// Advance a streak given the last recorded study day and today.
///
/// Branches:
/// - no previous study day: streak starts at 1
/// - same day: unchanged (same-day completions are idempotent)
/// - yesterday: streak + 1
/// - anything else, including future dates from clock skew: reset to 1
pub fn advance(streak_count: u32, last_study_date: Option<NaiveDate>, today: NaiveDate) -> StreakUpdate {
    let Some(last) = last_study_date else {
        return StreakUpdate {
            streak_count: 1,
            advanced: true,
        };
    };

    if last == today {
        StreakUpdate {
            streak_count,
            advanced: false,
        }
    } else if last.succ_opt() == Some(today) {
        StreakUpdate {
            streak_count: streak_count + 1,
            advanced: true,
        }
    } else {
        StreakUpdate {
            streak_count: 1,
            advanced: true,
        }
    }
}

/// Apply a study-day completion to the stored user record.
///
/// `last_study_date` is stamped to `today` on every call, whichever branch
/// the transition takes. Runs against whatever transaction is open on the
/// connection, so a resource completion updates streak and goals atomically.
///
/// # Errors
/// Returns a not-found error for an unknown user, or a database error if
/// the write fails.
pub fn record_study_activity(db: &Database, user_id: &str, today: NaiveDate) -> Result<StreakUpdate> {
    let user = db.get_user(user_id)?.ok_or_else(|| CoreError::NotFound {
        entity: "user",
        id: user_id.to_string(),
    })?;

    let update = advance(user.streak_count, user.last_study_date, today);
    db.update_user_streak(&user.id, update.streak_count, today)?;
    Ok(update)
}
