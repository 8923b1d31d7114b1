//! Task management commands for CLI.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;
use studybuddy_core::planner::{due_at_from_date, NewTask, Priority, Task, TaskType, TaskUpdate};
use studybuddy_core::{PlannerDb, UserId};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task type: task, assignment, exam, demo or presentation
        #[arg(long = "type")]
        task_type: Option<String>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: none, low, medium or high
        #[arg(long, default_value = "none")]
        priority: String,
        /// Module ID to associate with
        #[arg(long)]
        module: Option<String>,
        /// Due date (YYYY-MM-DD), due at 09:00 local time
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks, newest first
    List {
        /// Filter by priority (all, none, low, medium, high)
        #[arg(long, default_value = "all")]
        priority: String,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// New due date (YYYY-MM-DD), or "none" to clear it
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Tasks due from now on, soonest first
    Upcoming {
        #[arg(long, default_value = "3")]
        limit: usize,
    },
}

/// Task as printed: the stored fields plus the card tone for its type.
#[derive(Serialize)]
struct TaskCard<'a> {
    #[serde(flatten)]
    task: &'a Task,
    card_tone: &'static str,
}

impl<'a> From<&'a Task> for TaskCard<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            task,
            card_tone: task.task_type.card_tone(),
        }
    }
}

fn cards(tasks: &[Task]) -> Vec<TaskCard<'_>> {
    tasks.iter().map(TaskCard::from).collect()
}

fn parse_task_type(s: &str) -> Result<TaskType, String> {
    TaskType::parse(s).ok_or_else(|| {
        let names: Vec<_> = TaskType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown task type: {s} (expected one of {})", names.join(", "))
    })
}

fn parse_due(s: &str) -> Result<Option<chrono::DateTime<Utc>>, String> {
    if s.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map(|date| Some(due_at_from_date(date)))
        .map_err(|_| format!("invalid due date: {s} (expected YYYY-MM-DD)"))
}

pub fn run(action: TaskAction, user: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Add {
            title,
            task_type,
            description,
            priority,
            module,
            due,
        } => {
            let new = NewTask {
                title,
                description,
                task_type: task_type.as_deref().map(parse_task_type).transpose()?,
                priority: Priority::parse(&priority),
                module_id: module,
                due_at: due.as_deref().map(parse_due).transpose()?.flatten(),
            };
            let task = db.create_task(user, new, Utc::now())?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&TaskCard::from(&task))?);
        }
        TaskAction::List { priority } => {
            let tasks = db.list_tasks(user, Priority::parse_filter(&priority))?;
            println!("{}", serde_json::to_string_pretty(&cards(&tasks))?);
        }
        TaskAction::Get { id } => {
            let task = db
                .get_task(user, &id)?
                .ok_or_else(|| format!("Task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&TaskCard::from(&task))?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            task_type,
            priority,
            due,
            completed,
        } => {
            let update = TaskUpdate {
                title,
                description,
                task_type: task_type.as_deref().map(parse_task_type).transpose()?,
                priority: priority.as_deref().map(Priority::parse),
                due_at: due.as_deref().map(parse_due).transpose()?,
                completed,
            };
            let task = db.update_task(user, &id, update)?;
            println!("Task updated:");
            println!("{}", serde_json::to_string_pretty(&TaskCard::from(&task))?);
        }
        TaskAction::Done { id, undo } => {
            db.set_completed(user, &id, !undo)?;
            println!("Task {}: {id}", if undo { "reopened" } else { "done" });
        }
        TaskAction::Delete { id } => {
            db.delete_task(user, &id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Upcoming { limit } => {
            let tasks = db.upcoming_tasks(user, Utc::now(), limit)?;
            println!("{}", serde_json::to_string_pretty(&cards(&tasks))?);
        }
    }
    Ok(())
}
