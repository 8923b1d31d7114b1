use chrono::Utc;
use studybuddy_core::{Dashboard, Database, PlannerDb, UserId};

pub fn run(user: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let planner = PlannerDb::open()?;
    let sessions = Database::open()?;
    let home = Dashboard::load(&planner, &sessions, user, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&home)?);
    Ok(())
}
