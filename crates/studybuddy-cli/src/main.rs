use clap::{Parser, Subcommand};
use studybuddy_core::{Config, UserId};

mod commands;
mod telemetry;

#[derive(Parser)]
#[command(name = "studybuddy", version, about = "StudyBuddy CLI")]
struct Cli {
    /// User whose data is read and written (default: config `user.id`)
    #[arg(long, global = true, env = "STUDYBUDDY_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus sessions
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Focus statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Module and timetable management
    Module {
        #[command(subcommand)]
        action: commands::module::ModuleAction,
    },
    /// User profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Home screen summary
    Home,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    telemetry::init_tracing(&config.log_level);

    let user = cli
        .user
        .filter(|u| !u.trim().is_empty())
        .map(UserId::from)
        .unwrap_or_else(|| config.default_user());

    let result = match cli.command {
        Commands::Focus { action } => commands::focus::run(action, &user, &config),
        Commands::Stats { action } => commands::stats::run(action, &user),
        Commands::Task { action } => commands::task::run(action, &user),
        Commands::Module { action } => commands::module::run(action, &user),
        Commands::Profile { action } => commands::profile::run(action, &user),
        Commands::Home => commands::home::run(&user),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
