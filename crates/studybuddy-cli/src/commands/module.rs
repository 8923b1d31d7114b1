//! Module and weekly timetable commands.

use chrono::Utc;
use clap::Subcommand;
use studybuddy_core::planner::{parse_clock_time, parse_weekday, NewModule};
use studybuddy_core::{PlannerDb, UserId};

#[derive(Subcommand)]
pub enum ModuleAction {
    /// Create a module with its weekly timetable slot
    Add {
        /// Module title
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "1")]
        year: String,
        #[arg(long, default_value = "1")]
        semester: String,
        /// Day of the week (e.g. "Mon", "tuesday")
        #[arg(long, default_value = "Mon")]
        day: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// End time (HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
    /// List modules, newest first
    List,
    /// Get module details
    Get {
        /// Module ID
        id: String,
    },
    /// Delete a module and its timetable slot
    Delete {
        /// Module ID
        id: String,
    },
}

fn parse_time(s: &str) -> Result<u32, String> {
    parse_clock_time(s).ok_or_else(|| format!("invalid time: {s} (expected HH:MM)"))
}

pub fn run(action: ModuleAction, user: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ModuleAction::Add {
            title,
            description,
            year,
            semester,
            day,
            start,
            end,
        } => {
            let new = NewModule {
                title,
                description,
                year,
                semester,
                day_of_week: parse_weekday(&day),
                start_min: start.as_deref().map(parse_time).transpose()?,
                end_min: end.as_deref().map(parse_time).transpose()?,
            };
            let module = db.create_module(user, new, Utc::now())?;
            println!("Module created: {}", module.id);
            println!("{}", serde_json::to_string_pretty(&module)?);
        }
        ModuleAction::List => {
            let modules = db.list_modules(user)?;
            println!("{}", serde_json::to_string_pretty(&modules)?);
        }
        ModuleAction::Get { id } => {
            let module = db
                .get_module(user, &id)?
                .ok_or_else(|| format!("Module not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&module)?);
        }
        ModuleAction::Delete { id } => {
            db.delete_module(user, &id)?;
            println!("Module deleted: {id}");
        }
    }
    Ok(())
}
