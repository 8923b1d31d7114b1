//! Study planner: type-tagged tasks, modules with a weekly timetable slot,
//! and the user profile.

mod module;
mod profile;
mod task;

pub use module::{
    format_minutes, parse_clock_time, parse_weekday, Module, NewModule, TimetableEvent,
};
pub use profile::Profile;
pub use task::{due_at_from_date, NewTask, Priority, Task, TaskType, TaskUpdate};
