use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::focus::{CompletionRecord, Phase, PhaseChange};

/// Every observable focus-session change as a serializable value.
/// The CLI prints these as JSON lines; tests collect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PhaseChanged {
        phase: Phase,
        iteration: u32,
        duration_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: u64,
    },
    SessionCompleted {
        record: CompletionRecord,
    },
}

impl Event {
    pub fn phase_changed(change: PhaseChange) -> Self {
        Event::PhaseChanged {
            phase: change.phase,
            iteration: change.iteration,
            duration_secs: change.duration_secs,
            at: Utc::now(),
        }
    }
}
