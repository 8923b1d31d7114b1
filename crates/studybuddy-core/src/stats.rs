//! Weekly focus statistics.
//!
//! Every full hour of focus in the last seven days grows one flower; the
//! garden shows at most two rows of eight.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::focus::{CompletionRecord, SessionRepository};
use crate::user::UserId;

/// Flowers the garden can show.
pub const GARDEN_CAPACITY: u64 = 16;

/// Window covered by [`weekly_focus`].
pub const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyFocus {
    pub total_minutes: u64,
    pub hours: f64,
    pub flowers: u64,
    pub garden_flowers: u64,
}

impl WeeklyFocus {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CompletionRecord>) -> Self {
        let total_minutes = records
            .into_iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.total_study_minutes));
        let hours = total_minutes as f64 / 60.0;
        let flowers = total_minutes / 60;
        Self {
            total_minutes,
            hours,
            flowers,
            garden_flowers: flowers.min(GARDEN_CAPACITY),
        }
    }

    /// `3.5 hours`
    pub fn hours_text(&self) -> String {
        format!("{:.1} hours", self.hours)
    }
}

/// Focus summary for the seven days before `now`.
///
/// A failed query is logged and reads as an empty week.
pub fn weekly_focus<R: SessionRepository>(repo: &R, user: &UserId, now: DateTime<Utc>) -> WeeklyFocus {
    let since = (now - Duration::days(WEEK_DAYS)).timestamp_millis();
    match repo.query_recent(user, since) {
        Ok(records) => WeeklyFocus::from_records(&records),
        Err(e) => {
            warn!(user = %user, error = %e, "failed to load weekly focus");
            WeeklyFocus::default()
        }
    }
}
