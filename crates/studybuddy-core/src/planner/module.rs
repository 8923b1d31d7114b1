use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::non_blank;
use crate::error::ValidationError;

/// Weekly timetable slot of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEvent {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub day_of_week: Weekday,
    /// Minutes from midnight.
    pub start_min: u32,
    pub end_min: u32,
    pub rrule: String,
    pub created_at: DateTime<Utc>,
}

impl TimetableEvent {
    /// `Mon 09:00-10:30`
    pub fn slot_text(&self) -> String {
        format!(
            "{} {}-{}",
            self.day_of_week,
            format_minutes(self.start_min),
            format_minutes(self.end_min)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub year: String,
    pub semester: String,
    pub created_at: DateTime<Utc>,
    pub slot: Option<TimetableEvent>,
}

impl Module {
    /// `Year 3 • Semester 2 • Mon`
    pub fn meta_text(&self) -> String {
        let day = self
            .slot
            .as_ref()
            .map(|s| format!(" • {}", s.day_of_week))
            .unwrap_or_default();
        format!("Year {} • Semester {}{day}", self.year, self.semester)
    }
}

/// Form input for a new module and its weekly slot.
#[derive(Debug, Clone)]
pub struct NewModule {
    pub title: String,
    pub description: Option<String>,
    pub year: String,
    pub semester: String,
    pub day_of_week: Weekday,
    pub start_min: Option<u32>,
    pub end_min: Option<u32>,
}

impl Default for NewModule {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            year: "1".into(),
            semester: "1".into(),
            day_of_week: Weekday::Mon,
            start_min: None,
            end_min: None,
        }
    }
}

impl NewModule {
    pub fn validate(&self) -> Result<(u32, u32), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Module title is required"));
        }
        let (Some(start_min), Some(end_min)) = (self.start_min, self.end_min) else {
            return Err(ValidationError::Required("Please pick start and end time"));
        };
        if end_min <= start_min {
            return Err(ValidationError::InvalidTimeRange { start_min, end_min });
        }
        Ok((start_min, end_min))
    }

    /// Validate and build the module together with its timetable slot.
    pub fn into_module(self, now: DateTime<Utc>) -> Result<Module, ValidationError> {
        let (start_min, end_min) = self.validate()?;
        let id = Uuid::new_v4().to_string();
        let title = self.title.trim().to_string();
        let slot = TimetableEvent {
            id: Uuid::new_v4().to_string(),
            module_id: id.clone(),
            title: title.clone(),
            day_of_week: self.day_of_week,
            start_min,
            end_min,
            rrule: "WEEKLY".into(),
            created_at: now,
        };
        Ok(Module {
            id,
            title,
            description: self.description.and_then(non_blank),
            year: self.year,
            semester: self.semester,
            created_at: now,
            slot: Some(slot),
        })
    }
}

/// Parse a weekday name; anything unrecognized is Monday.
pub fn parse_weekday(s: &str) -> Weekday {
    s.trim().parse::<Weekday>().unwrap_or(Weekday::Mon)
}

/// Parse `HH:MM` into minutes from midnight.
pub fn parse_clock_time(s: &str) -> Option<u32> {
    let t = NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()?;
    Some(t.hour() * 60 + t.minute())
}

pub fn format_minutes(min: u32) -> String {
    format!("{:02}:{:02}", min / 60, min % 60)
}
