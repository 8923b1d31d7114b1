//! Home screen summary.

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::focus::SessionRepository;
use crate::planner::Task;
use crate::stats::{weekly_focus, WeeklyFocus};
use crate::storage::PlannerDb;
use crate::user::UserId;

/// Upcoming tasks shown on the home screen.
pub const UPCOMING_LIMIT: usize = 3;

/// Time-of-day greeting for a local hour (0-23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// `Good morning, Ada`, or just the greeting without a name.
pub fn greeting(hour: u32, name: Option<&str>) -> String {
    let base = greeting_for_hour(hour);
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{base}, {name}"),
        None => base.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub greeting: String,
    pub upcoming: Vec<Task>,
    pub summary: String,
    pub focus: WeeklyFocus,
}

impl Dashboard {
    /// Gather the home screen for `user` at `now`.
    ///
    /// A missing profile only drops the name from the greeting; task and
    /// session storage errors are returned.
    pub fn load<R: SessionRepository>(
        planner: &PlannerDb,
        sessions: &R,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let name = match planner.get_profile(user) {
            Ok(profile) => profile.display_name().map(str::to_string),
            Err(e) => {
                warn!(user = %user, error = %e, "failed to load profile");
                None
            }
        };
        let hour = now.with_timezone(&Local).hour();
        let upcoming = planner.upcoming_tasks(user, now, UPCOMING_LIMIT)?;

        Ok(Self {
            greeting: greeting(hour, name.as_deref()),
            summary: format!("You have {} upcoming tasks", upcoming.len()),
            upcoming,
            focus: weekly_focus(sessions, user, now),
        })
    }
}
