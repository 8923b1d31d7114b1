use serde::{Deserialize, Serialize};

/// Phase of a focus session.
///
/// ```text
/// Study -> Break -> Study -> ... -> Break -> Complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Study,
    Break,
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Study => "Study",
            Phase::Break => "Break",
            Phase::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable progress of the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// 1-based, never above the configured iteration count.
    pub current_iteration: u32,
    pub phase: Phase,
    /// Seconds left in the active phase.
    pub remaining_secs: u64,
}

impl SessionState {
    pub(crate) fn first(study_secs: u64) -> Self {
        Self {
            current_iteration: 1,
            phase: Phase::Study,
            remaining_secs: study_secs,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}

/// Payload of a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub phase: Phase,
    pub iteration: u32,
    /// Countdown length of the new phase; `None` for `Complete`.
    pub duration_secs: Option<u64>,
}

/// Format seconds as `mm:ss` (minutes may exceed 59).
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
