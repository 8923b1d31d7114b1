pub mod completions;
pub mod config;
pub mod focus;
pub mod home;
pub mod module;
pub mod profile;
pub mod stats;
pub mod task;
