use chrono::Utc;
use clap::Subcommand;
use studybuddy_core::stats::weekly_focus;
use studybuddy_core::{Database, UserId};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Focus time and flowers for the last seven days
    Week,
}

pub fn run(action: StatsAction, user: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Week => {
            let week = weekly_focus(&db, user, Utc::now());
            println!("{}", serde_json::to_string_pretty(&week)?);
        }
    }
    Ok(())
}
