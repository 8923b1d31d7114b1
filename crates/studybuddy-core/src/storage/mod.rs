mod config;
pub mod database;
pub mod planner_db;

pub use config::{Config, FocusDefaults, UserConfig};
pub use database::{Database, StoredSession};
pub use planner_db::PlannerDb;

use std::path::PathBuf;

use crate::error::Result;

/// File name of the SQLite database inside [`data_dir`].
pub const DB_FILE: &str = "studybuddy.db";

/// Returns the data directory, creating it if needed.
///
/// `STUDYBUDDY_DATA_DIR` wins when set. Otherwise `~/.config/studybuddy/`,
/// or `~/.config/studybuddy-dev/` when `STUDYBUDDY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYBUDDY_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studybuddy-dev")
            } else {
                base_dir.join("studybuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Path of the SQLite database file.
pub fn db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(DB_FILE))
}
