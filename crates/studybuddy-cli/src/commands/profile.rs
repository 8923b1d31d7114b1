use clap::Subcommand;
use studybuddy_core::planner::Profile;
use studybuddy_core::{PlannerDb, UserId};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show,
    /// Update profile fields; omitted fields are kept
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Date of birth
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

pub fn run(action: ProfileAction, user: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ProfileAction::Show => {
            let profile = db.get_profile(user)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Set { name, dob, email } => {
            let profile = db.save_profile(user, Profile { name, dob, email })?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}
