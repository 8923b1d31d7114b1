use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::config::SessionConfig;

/// Summary of a finished focus session, handed off for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub completed_at_epoch_ms: i64,
    /// `study_minutes_per_cycle * iterations`.
    pub total_study_minutes: u64,
    pub study_minutes_per_cycle: u32,
    pub break_minutes_per_cycle: u32,
    pub iterations: u32,
}

impl CompletionRecord {
    pub fn new(config: &SessionConfig, completed_at: DateTime<Utc>) -> Self {
        Self {
            completed_at_epoch_ms: completed_at.timestamp_millis(),
            total_study_minutes: config.total_study_minutes(),
            study_minutes_per_cycle: config.study_minutes,
            break_minutes_per_cycle: config.break_minutes,
            iterations: config.iterations,
        }
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.completed_at_epoch_ms)
            .single()
            .unwrap_or_default()
    }
}
