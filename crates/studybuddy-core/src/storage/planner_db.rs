//! SQLite-based storage for planner tasks, modules and the user profile.
//!
//! Every table carries a `user_id` column and every query filters on it.

use std::path::Path;

use chrono::{DateTime, Utc, Weekday};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::db_path;
use crate::error::{CoreError, DatabaseError, Result};
use crate::planner::{
    parse_weekday, Module, NewModule, NewTask, Priority, Profile, Task, TaskType, TaskUpdate,
    TimetableEvent,
};
use crate::user::UserId;

// === Helper Functions ===

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Due dates are stored as epoch milliseconds so they order numerically
fn parse_due_at(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(DateTime::from_timestamp_millis)
}

fn format_due_at(due_at: Option<DateTime<Utc>>) -> Option<i64> {
    due_at.map(|dt| dt.timestamp_millis())
}

fn format_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.task_type, t.priority,
     t.module_id, m.title, t.due_at_ms, t.completed, t.created_at";

/// Build a Task from a row selected with [`TASK_COLUMNS`]
fn row_to_task(row: &rusqlite::Row) -> std::result::Result<Task, rusqlite::Error> {
    let task_type: Option<String> = row.get(3)?;
    let priority: Option<String> = row.get(4)?;
    let created_at: String = row.get(9)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        task_type: TaskType::from_stored(task_type.as_deref()),
        priority: priority.as_deref().map(Priority::parse).unwrap_or_default(),
        module_id: row.get(5)?,
        module_title: row.get(6)?,
        due_at: parse_due_at(row.get(7)?),
        completed: row.get(8)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

const MODULE_COLUMNS: &str = "m.id, m.title, m.description, m.year, m.semester, m.created_at,
     e.id, e.day_of_week, e.start_min, e.end_min, e.rrule, e.created_at";

/// Build a Module (with its slot, when one exists) from a row selected with
/// [`MODULE_COLUMNS`]
fn row_to_module(row: &rusqlite::Row) -> std::result::Result<Module, rusqlite::Error> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let created_at: String = row.get(5)?;

    let slot = match row.get::<_, Option<String>>(6)? {
        Some(event_id) => {
            let day: String = row.get(7)?;
            let event_created: String = row.get(11)?;
            Some(TimetableEvent {
                id: event_id,
                module_id: id.clone(),
                title: title.clone(),
                day_of_week: parse_weekday(&day),
                start_min: row.get(8)?,
                end_min: row.get(9)?,
                rrule: row.get(10)?,
                created_at: parse_datetime_fallback(&event_created),
            })
        }
        None => None,
    };

    Ok(Module {
        id,
        title,
        description: row.get(2)?,
        year: row.get(3)?,
        semester: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at),
        slot,
    })
}

fn not_found(kind: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// SQLite database for the study planner.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner tables in `<data_dir>/studybuddy.db`.
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

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "PRAGMA foreign_keys = ON;

                CREATE TABLE IF NOT EXISTS modules (
                    id          TEXT PRIMARY KEY,
                    user_id     TEXT NOT NULL,
                    title       TEXT NOT NULL,
                    description TEXT,
                    year        TEXT NOT NULL,
                    semester    TEXT NOT NULL,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS timetable_events (
                    id          TEXT PRIMARY KEY,
                    user_id     TEXT NOT NULL,
                    module_id   TEXT NOT NULL REFERENCES modules(id) ON DELETE CASCADE,
                    day_of_week TEXT NOT NULL,
                    start_min   INTEGER NOT NULL,
                    end_min     INTEGER NOT NULL,
                    rrule       TEXT NOT NULL DEFAULT 'WEEKLY',
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id          TEXT PRIMARY KEY,
                    user_id     TEXT NOT NULL,
                    title       TEXT NOT NULL,
                    description TEXT,
                    task_type   TEXT,
                    priority    TEXT,
                    module_id   TEXT REFERENCES modules(id) ON DELETE SET NULL,
                    due_at_ms   INTEGER,
                    completed   INTEGER NOT NULL DEFAULT 0,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS profiles (
                    user_id TEXT PRIMARY KEY,
                    name    TEXT,
                    dob     TEXT,
                    email   TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_user_due ON tasks(user_id, due_at_ms);
                CREATE INDEX IF NOT EXISTS idx_modules_user ON modules(user_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Run `f` inside an immediate transaction, rolling back on error.
    fn in_transaction<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    // === Task CRUD ===

    /// Validate and insert a new task.
    ///
    /// # Errors
    /// Returns a validation error for a blank title or missing type, and
    /// `NotFound` when `module_id` names no module of this user.
    pub fn create_task(&self, user: &UserId, new: NewTask, now: DateTime<Utc>) -> Result<Task> {
        new.validate()?;
        let module = match new.module_id.as_deref() {
            Some(module_id) => Some(
                self.get_module(user, module_id)?
                    .ok_or_else(|| not_found("module", module_id))?,
            ),
            None => None,
        };
        let task = new.into_task(module.as_ref(), now)?;

        self.conn.execute(
            "INSERT INTO tasks (
                id, user_id, title, description, task_type, priority,
                module_id, due_at_ms, completed, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                user.as_str(),
                task.title,
                task.description,
                task.task_type.as_str(),
                task.priority.as_str(),
                task.module_id,
                format_due_at(task.due_at),
                task.completed,
                task.created_at.to_rfc3339(),
            ],
        )?;
        info!(id = %task.id, user = %user, "task created");
        Ok(task)
    }

    /// Get a task by ID.
    pub fn get_task(&self, user: &UserId, id: &str) -> Result<Option<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS}
             FROM tasks t LEFT JOIN modules m ON m.id = t.module_id
             WHERE t.user_id = ?1 AND t.id = ?2"
        );
        let task = self
            .conn
            .query_row(&sql, params![user.as_str(), id], row_to_task)
            .optional()?;
        Ok(task)
    }

    /// All tasks of `user`, newest first. `priority` of `None` lists all.
    pub fn list_tasks(&self, user: &UserId, priority: Option<Priority>) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS}
             FROM tasks t LEFT JOIN modules m ON m.id = t.module_id
             WHERE t.user_id = ?1 AND (?2 IS NULL OR t.priority = ?2)
             ORDER BY t.created_at DESC, t.rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![user.as_str(), priority.map(Priority::as_str)],
            row_to_task,
        )?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Apply a partial update and return the updated task.
    pub fn update_task(&self, user: &UserId, id: &str, update: TaskUpdate) -> Result<Task> {
        let mut task = self
            .get_task(user, id)?
            .ok_or_else(|| not_found("task", id))?;
        task.apply(update)?;

        self.conn.execute(
            "UPDATE tasks SET title = ?3, description = ?4, task_type = ?5, priority = ?6,
                              due_at_ms = ?7, completed = ?8
             WHERE user_id = ?1 AND id = ?2",
            params![
                user.as_str(),
                id,
                task.title,
                task.description,
                task.task_type.as_str(),
                task.priority.as_str(),
                format_due_at(task.due_at),
                task.completed,
            ],
        )?;
        debug!(id, user = %user, "task updated");
        Ok(task)
    }

    pub fn set_completed(&self, user: &UserId, id: &str, completed: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?3 WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id, completed],
        )?;
        if changed == 0 {
            return Err(not_found("task", id));
        }
        Ok(())
    }

    pub fn delete_task(&self, user: &UserId, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id],
        )?;
        if changed == 0 {
            return Err(not_found("task", id));
        }
        info!(id, user = %user, "task deleted");
        Ok(())
    }

    /// Tasks due at or after `now`, soonest first, at most `limit`.
    /// Completed tasks are included.
    pub fn upcoming_tasks(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS}
             FROM tasks t LEFT JOIN modules m ON m.id = t.module_id
             WHERE t.user_id = ?1 AND t.due_at_ms IS NOT NULL AND t.due_at_ms >= ?2
             ORDER BY t.due_at_ms ASC, t.rowid ASC
             LIMIT ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                user.as_str(),
                now.timestamp_millis(),
                i64::try_from(limit).unwrap_or(i64::MAX)
            ],
            row_to_task,
        )?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    // === Module CRUD ===

    /// Validate and insert a module together with its weekly timetable
    /// event, atomically.
    pub fn create_module(
        &self,
        user: &UserId,
        new: NewModule,
        now: DateTime<Utc>,
    ) -> Result<Module> {
        let module = new.into_module(now)?;

        self.in_transaction(|| {
            self.conn.execute(
                "INSERT INTO modules (id, user_id, title, description, year, semester, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    module.id,
                    user.as_str(),
                    module.title,
                    module.description,
                    module.year,
                    module.semester,
                    module.created_at.to_rfc3339(),
                ],
            )?;
            if let Some(slot) = &module.slot {
                self.conn.execute(
                    "INSERT INTO timetable_events (
                        id, user_id, module_id, day_of_week, start_min, end_min, rrule, created_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        slot.id,
                        user.as_str(),
                        module.id,
                        format_weekday(slot.day_of_week),
                        slot.start_min,
                        slot.end_min,
                        slot.rrule,
                        slot.created_at.to_rfc3339(),
                    ],
                )?;
            }
            Ok(())
        })?;

        info!(id = %module.id, user = %user, "module created");
        Ok(module)
    }

    pub fn get_module(&self, user: &UserId, id: &str) -> Result<Option<Module>> {
        let sql = format!(
            "SELECT {MODULE_COLUMNS}
             FROM modules m LEFT JOIN timetable_events e ON e.module_id = m.id
             WHERE m.user_id = ?1 AND m.id = ?2
             LIMIT 1"
        );
        let module = self
            .conn
            .query_row(&sql, params![user.as_str(), id], row_to_module)
            .optional()?;
        Ok(module)
    }

    /// All modules of `user`, newest first.
    pub fn list_modules(&self, user: &UserId) -> Result<Vec<Module>> {
        let sql = format!(
            "SELECT {MODULE_COLUMNS}
             FROM modules m LEFT JOIN timetable_events e ON e.module_id = m.id
             WHERE m.user_id = ?1
             ORDER BY m.created_at DESC, m.rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user.as_str()], row_to_module)?;

        let mut modules = Vec::new();
        for row in rows {
            modules.push(row?);
        }
        Ok(modules)
    }

    /// Delete a module and its timetable event. Tasks that referenced it
    /// are kept with the reference cleared.
    pub fn delete_module(&self, user: &UserId, id: &str) -> Result<()> {
        let changed = self.in_transaction(|| {
            self.conn.execute(
                "UPDATE tasks SET module_id = NULL WHERE user_id = ?1 AND module_id = ?2",
                params![user.as_str(), id],
            )?;
            self.conn.execute(
                "DELETE FROM timetable_events WHERE user_id = ?1 AND module_id = ?2",
                params![user.as_str(), id],
            )?;
            let changed = self.conn.execute(
                "DELETE FROM modules WHERE user_id = ?1 AND id = ?2",
                params![user.as_str(), id],
            )?;
            Ok(changed)
        })?;
        if changed == 0 {
            return Err(not_found("module", id));
        }
        info!(id, user = %user, "module deleted");
        Ok(())
    }

    // === Profile ===

    /// The stored profile, or an empty one.
    pub fn get_profile(&self, user: &UserId) -> Result<Profile> {
        let profile = self
            .conn
            .query_row(
                "SELECT name, dob, email FROM profiles WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    Ok(Profile {
                        name: row.get(0)?,
                        dob: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(profile.unwrap_or_default())
    }

    /// Merge `update` into the stored profile and return the result.
    pub fn save_profile(&self, user: &UserId, update: Profile) -> Result<Profile> {
        let mut profile = self.get_profile(user)?;
        profile.merge(update);
        self.conn.execute(
            "INSERT INTO profiles (user_id, name, dob, email) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name, dob = excluded.dob, email = excluded.email",
            params![user.as_str(), profile.name, profile.dob, profile.email],
        )?;
        debug!(user = %user, "profile saved");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap()
    }

    fn task(title: &str, due_in_hours: Option<i64>) -> NewTask {
        NewTask {
            title: title.into(),
            task_type: Some(TaskType::Assignment),
            due_at: due_in_hours.map(|h| now() + Duration::hours(h)),
            ..Default::default()
        }
    }

    fn module(title: &str) -> NewModule {
        NewModule {
            title: title.into(),
            day_of_week: Weekday::Tue,
            start_min: Some(600),
            end_min: Some(720),
            ..Default::default()
        }
    }

    #[test]
    fn create_and_get_task() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let created = db.create_task(&user, task("Essay", Some(24)), now()).unwrap();

        let found = db.get_task(&user, &created.id).unwrap().unwrap();
        assert_eq!(found.title, "Essay");
        assert_eq!(found.task_type, TaskType::Assignment);
        assert_eq!(found.due_at, created.due_at);
        assert!(db.get_task(&UserId::new("bob"), &created.id).unwrap().is_none());
    }

    #[test]
    fn create_task_rejects_invalid_input() {
        let db = PlannerDb::open_in_memory().unwrap();
        let err = db
            .create_task(&UserId::new("a"), task(" ", None), now())
            .unwrap_err();
        assert_eq!(err.to_string(), "Task title is required");
        assert!(db.list_tasks(&UserId::new("a"), None).unwrap().is_empty());
    }

    #[test]
    fn create_task_with_unknown_module_fails() {
        let db = PlannerDb::open_in_memory().unwrap();
        let mut input = task("Essay", None);
        input.module_id = Some("missing".into());
        let err = db.create_task(&UserId::new("a"), input, now()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "module", .. }));
    }

    #[test]
    fn list_is_newest_first_and_filters_priority() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let mut first = task("First", None);
        first.priority = Priority::High;
        db.create_task(&user, first, now()).unwrap();
        db.create_task(&user, task("Second", None), now() + Duration::minutes(1))
            .unwrap();

        let titles: Vec<_> = db
            .list_tasks(&user, None)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["Second", "First"]);

        let high = db.list_tasks(&user, Some(Priority::High)).unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].title, "First");
    }

    #[test]
    fn upcoming_orders_by_due_and_limits() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        for (title, due) in [
            ("past", Some(-2)),
            ("later", Some(48)),
            ("none", None),
            ("soon", Some(1)),
            ("mid", Some(5)),
            ("last", Some(100)),
        ] {
            db.create_task(&user, task(title, due), now()).unwrap();
        }

        let titles: Vec<_> = db
            .upcoming_tasks(&user, now(), 3)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["soon", "mid", "later"]);
    }

    #[test]
    fn update_done_and_delete() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let id = db.create_task(&user, task("Essay", None), now()).unwrap().id;

        let updated = db
            .update_task(
                &user,
                &id,
                TaskUpdate {
                    title: Some("Essay v2".into()),
                    priority: Some(Priority::Medium),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Essay v2");

        db.set_completed(&user, &id, true).unwrap();
        let stored = db.get_task(&user, &id).unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.priority, Priority::Medium);

        db.delete_task(&user, &id).unwrap();
        assert!(matches!(
            db.delete_task(&user, &id),
            Err(CoreError::NotFound { kind: "task", .. })
        ));
    }

    #[test]
    fn module_round_trip_with_slot() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let created = db.create_module(&user, module("Databases"), now()).unwrap();

        let found = db.get_module(&user, &created.id).unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.meta_text(), "Year 1 • Semester 1 • Tue");
        assert_eq!(db.list_modules(&user).unwrap().len(), 1);
    }

    #[test]
    fn invalid_module_is_not_stored() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let mut input = module("Databases");
        input.end_min = Some(500);
        let err = db.create_module(&user, input, now()).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");
        assert!(db.list_modules(&user).unwrap().is_empty());
    }

    #[test]
    fn deleting_module_clears_task_reference() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        let module = db.create_module(&user, module("Databases"), now()).unwrap();
        let mut input = task("ER diagram", None);
        input.module_id = Some(module.id.clone());
        let created = db.create_task(&user, input, now()).unwrap();
        assert_eq!(created.module_title.as_deref(), Some("Databases"));

        db.delete_module(&user, &module.id).unwrap();

        let stored = db.get_task(&user, &created.id).unwrap().unwrap();
        assert_eq!(stored.module_id, None);
        assert_eq!(stored.module_title, None);
        let events: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM timetable_events", [], |r| r.get(0))
            .unwrap();
        assert_eq!(events, 0);
    }

    #[test]
    fn profile_save_merges() {
        let db = PlannerDb::open_in_memory().unwrap();
        let user = UserId::new("alice");
        assert_eq!(db.get_profile(&user).unwrap(), Profile::default());

        db.save_profile(
            &user,
            Profile {
                name: Some("Alice".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let merged = db
            .save_profile(
                &user,
                Profile {
                    email: Some("alice@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(merged.name.as_deref(), Some("Alice"));
        assert_eq!(db.get_profile(&user).unwrap(), merged);
    }
}
