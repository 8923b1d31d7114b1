mod config;
mod controller;
mod observer;
mod record;
mod repository;
mod runner;
mod scheduler;
mod state;

pub use config::{
    SessionConfig, DEFAULT_BREAK_MINUTES, DEFAULT_ITERATIONS, DEFAULT_STUDY_MINUTES,
};
pub use controller::FocusSessionController;
pub use observer::{EventLog, EventSink, SessionObserver};
pub use record::CompletionRecord;
pub use repository::{Persisting, SessionRepository};
pub use runner::{drive, SessionOutcome};
pub use scheduler::{IntervalScheduler, ManualScheduler, TickScheduler};
pub use state::{format_clock, Phase, PhaseChange, SessionState};
