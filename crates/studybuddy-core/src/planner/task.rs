use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::module::Module;
use crate::error::ValidationError;

/// What kind of work a task is. Drives the card tone in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Task,
    Assignment,
    Exam,
    Demo,
    Presentation,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Task,
        TaskType::Assignment,
        TaskType::Exam,
        TaskType::Demo,
        TaskType::Presentation,
    ];

    /// Strict parse for user input. Case and surrounding space are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Some(TaskType::Task),
            "assignment" => Some(TaskType::Assignment),
            "exam" => Some(TaskType::Exam),
            "demo" => Some(TaskType::Demo),
            "presentation" => Some(TaskType::Presentation),
            _ => None,
        }
    }

    /// Lenient parse for stored values; anything unknown reads as `Task`.
    pub fn from_stored(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or(TaskType::Task)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Task => "task",
            TaskType::Assignment => "assignment",
            TaskType::Exam => "exam",
            TaskType::Demo => "demo",
            TaskType::Presentation => "presentation",
        }
    }

    /// Named soft background tone for a task card of this type.
    pub fn card_tone(self) -> &'static str {
        match self {
            TaskType::Assignment => "info_blue_soft",
            TaskType::Exam => "warning_orange_soft",
            TaskType::Demo => "accent_amber_soft",
            TaskType::Presentation => "accent_coral_soft",
            TaskType::Task => "success_green_soft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Unknown or missing input maps to `None`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::None,
        }
    }

    /// Parse a list filter. `"all"` means no filter.
    pub fn parse_filter(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            None
        } else {
            Some(Self::parse(s))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::None => "NONE",
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub task_type: TaskType,
    pub priority: Priority,
    pub module_id: Option<String>,
    pub module_title: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// `Due: 04 May • High`, or `No due date • None`.
    pub fn meta_text(&self) -> String {
        let due = match self.due_at {
            Some(at) => format!("Due: {}", at.with_timezone(&Local).format("%d %b")),
            None => "No due date".to_string(),
        };
        format!("{due} • {}", self.priority.label())
    }

    /// Apply a partial update. The title, when given, must not be blank.
    pub fn apply(&mut self, update: TaskUpdate) -> Result<(), ValidationError> {
        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(ValidationError::Required("Task title is required"));
            }
            self.title = title.to_string();
        }
        if let Some(description) = update.description {
            self.description = non_blank(description);
        }
        if let Some(task_type) = update.task_type {
            self.task_type = task_type;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_at) = update.due_at {
            self.due_at = due_at;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        Ok(())
    }
}

/// Form input for a new task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub priority: Priority,
    pub module_id: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Task title is required"));
        }
        if self.task_type.is_none() {
            return Err(ValidationError::Required("Task type is required"));
        }
        Ok(())
    }

    /// Validate and build the task. `module` is the resolved module for
    /// `module_id`, if any.
    pub fn into_task(self, module: Option<&Module>, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        self.validate()?;
        Ok(Task {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.and_then(non_blank),
            task_type: self.task_type.unwrap_or(TaskType::Task),
            priority: self.priority,
            module_id: module.map(|m| m.id.clone()),
            module_title: module.map(|m| m.title.clone()),
            due_at: self.due_at,
            completed: false,
            created_at: now,
        })
    }
}

/// Partial task update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

/// A picked due date lands at 09:00 local time.
pub fn due_at_from_date(date: NaiveDate) -> DateTime<Utc> {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    let local = date.and_time(nine);
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

pub(crate) fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str, task_type: Option<TaskType>) -> NewTask {
        NewTask {
            title: title.into(),
            task_type,
            ..Default::default()
        }
    }

    #[test]
    fn title_is_required() {
        let err = new_task("   ", Some(TaskType::Exam)).validate().unwrap_err();
        assert_eq!(err.to_string(), "Task title is required");
    }

    #[test]
    fn type_is_required() {
        let err = new_task("Essay", None).validate().unwrap_err();
        assert_eq!(err.to_string(), "Task type is required");
    }

    #[test]
    fn into_task_trims_and_drops_blank_description() {
        let mut input = new_task("  Essay draft ", Some(TaskType::Assignment));
        input.description = Some("   ".into());
        let task = input.into_task(None, Utc::now()).unwrap();
        assert_eq!(task.title, "Essay draft");
        assert_eq!(task.description, None);
        assert!(!task.completed);
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn task_type_parsing() {
        assert_eq!(TaskType::parse(" Exam "), Some(TaskType::Exam));
        assert_eq!(TaskType::parse("Select type..."), None);
        assert_eq!(TaskType::from_stored(Some("quiz")), TaskType::Task);
        assert_eq!(TaskType::from_stored(None), TaskType::Task);
        for t in TaskType::ALL {
            assert_eq!(TaskType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn each_type_has_its_own_card_tone() {
        assert_eq!(TaskType::Exam.card_tone(), "warning_orange_soft");
        assert_eq!(TaskType::Task.card_tone(), "success_green_soft");
        let mut tones: Vec<_> = TaskType::ALL.iter().map(|t| t.card_tone()).collect();
        tones.sort_unstable();
        tones.dedup();
        assert_eq!(tones.len(), TaskType::ALL.len());
    }

    #[test]
    fn priority_parsing() {
        assert_eq!(Priority::parse("High"), Priority::High);
        assert_eq!(Priority::parse("urgent"), Priority::None);
        assert_eq!(Priority::parse_filter("All"), None);
        assert_eq!(Priority::parse_filter("low"), Some(Priority::Low));
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"MEDIUM\"");
    }

    #[test]
    fn apply_rejects_blank_title() {
        let mut task = new_task("Read", Some(TaskType::Task))
            .into_task(None, Utc::now())
            .unwrap();
        let err = task
            .apply(TaskUpdate {
                title: Some(" ".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::Required("Task title is required"));
        assert_eq!(task.title, "Read");
    }

    #[test]
    fn apply_updates_fields() {
        let mut task = new_task("Read", Some(TaskType::Task))
            .into_task(None, Utc::now())
            .unwrap();
        task.apply(TaskUpdate {
            priority: Some(Priority::High),
            completed: Some(true),
            due_at: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert!(task.meta_text().ends_with("• High"));
    }

    #[test]
    fn due_date_is_nine_local() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let due = due_at_from_date(date).with_timezone(&Local);
        assert_eq!(due.date_naive(), date);
        assert_eq!(due.format("%H:%M").to_string(), "09:00");
    }
}
