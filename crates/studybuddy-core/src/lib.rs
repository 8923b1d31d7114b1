//! # StudyBuddy Core Library
//!
//! Core logic for the StudyBuddy study companion. Everything the `studybuddy`
//! CLI does goes through this crate.
//!
//! ## Architecture
//!
//! - **Focus**: a tick-driven study/break state machine. The host owns the
//!   clock through [`focus::TickScheduler`] and calls `tick()` once per
//!   second; completion hands a [`focus::CompletionRecord`] to an observer.
//! - **Storage**: SQLite persistence for sessions and planner data, and
//!   TOML configuration.
//! - **Planner**: tasks, modules with a weekly timetable slot, and the
//!   user profile.
//! - **Stats / Dashboard**: weekly focus summary and the home screen.
//!
//! ## Key Components
//!
//! - [`FocusSessionController`]: the session state machine
//! - [`Database`]: completed session persistence
//! - [`PlannerDb`]: planner persistence
//! - [`Config`]: application configuration management

pub mod dashboard;
pub mod error;
pub mod events;
pub mod focus;
pub mod planner;
pub mod stats;
pub mod storage;
pub mod user;

pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use focus::{
    CompletionRecord, FocusSessionController, Phase, SessionConfig, SessionObserver,
    SessionRepository, SessionState,
};
pub use stats::WeeklyFocus;
pub use storage::{Config, Database, PlannerDb};
pub use user::UserId;
