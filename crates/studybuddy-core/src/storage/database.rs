//! SQLite-based focus session storage.
//!
//! Provides persistent storage for completed focus sessions, scoped per
//! user, and implements [`SessionRepository`] on top of it.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::focus::{CompletionRecord, SessionRepository};
use crate::user::UserId;

use super::db_path;

/// A completion record together with its storage id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: i64,
    #[serde(flatten)]
    pub record: CompletionRecord,
}

/// SQLite database for completed focus sessions.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/studybuddy.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&db_path()?)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS focus_sessions (
                    id                      INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id                 TEXT NOT NULL,
                    completed_at_ms         INTEGER NOT NULL,
                    total_study_minutes     INTEGER NOT NULL,
                    study_minutes_per_cycle INTEGER NOT NULL,
                    break_minutes_per_cycle INTEGER NOT NULL,
                    iterations              INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_focus_sessions_user_completed
                    ON focus_sessions(user_id, completed_at_ms);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Record a completed session for `user`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, user: &UserId, record: &CompletionRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO focus_sessions (
                user_id, completed_at_ms, total_study_minutes,
                study_minutes_per_cycle, break_minutes_per_cycle, iterations
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.as_str(),
                record.completed_at_epoch_ms,
                i64::try_from(record.total_study_minutes).unwrap_or(i64::MAX),
                record.study_minutes_per_cycle,
                record.break_minutes_per_cycle,
                record.iterations,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, user = %user, "recorded focus session");
        Ok(id)
    }

    /// Sessions completed at or after `since_epoch_ms`, oldest first.
    pub fn sessions_since(&self, user: &UserId, since_epoch_ms: i64) -> Result<Vec<StoredSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, completed_at_ms, total_study_minutes,
                    study_minutes_per_cycle, break_minutes_per_cycle, iterations
             FROM focus_sessions
             WHERE user_id = ?1 AND completed_at_ms >= ?2
             ORDER BY completed_at_ms ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![user.as_str(), since_epoch_ms], |row| {
            Ok(StoredSession {
                id: row.get(0)?,
                record: CompletionRecord {
                    completed_at_epoch_ms: row.get(1)?,
                    total_study_minutes: u64::try_from(row.get::<_, i64>(2)?).unwrap_or(0),
                    study_minutes_per_cycle: row.get(3)?,
                    break_minutes_per_cycle: row.get(4)?,
                    iterations: row.get(5)?,
                },
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Total number of stored sessions for `user`.
    pub fn session_count(&self, user: &UserId) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM focus_sessions WHERE user_id = ?1",
            params![user.as_str()],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl SessionRepository for Database {
    fn save(&self, user: &UserId, record: &CompletionRecord) -> Result<i64> {
        self.record_session(user, record)
    }

    fn query_recent(&self, user: &UserId, since_epoch_ms: i64) -> Result<Vec<CompletionRecord>> {
        Ok(self
            .sessions_since(user, since_epoch_ms)?
            .into_iter()
            .map(|s| s.record)
            .collect())
    }
}
