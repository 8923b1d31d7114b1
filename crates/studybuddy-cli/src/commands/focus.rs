//! Foreground focus sessions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use studybuddy_core::events::Event;
use studybuddy_core::focus::{
    drive, format_clock, EventSink, FocusSessionController, IntervalScheduler, Persisting, Phase,
    SessionOutcome,
};
use studybuddy_core::{Config, Database, UserId};
use tracing::info;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run a study/break session in the foreground (Ctrl-C cancels)
    Start {
        /// Study minutes per cycle; missing or non-numeric uses config
        /// focus.study_minutes
        #[arg(long, allow_hyphen_values = true)]
        study: Option<String>,
        /// Break minutes per cycle; 0 skips breaks
        #[arg(long = "break", allow_hyphen_values = true)]
        break_minutes: Option<String>,
        /// Number of study/break cycles
        #[arg(long, allow_hyphen_values = true)]
        iterations: Option<String>,
        /// Print one JSON event per line
        #[arg(long)]
        json: bool,
        /// Milliseconds per countdown second
        #[arg(long, hide = true, default_value = "1000")]
        tick_ms: u64,
    },
    /// Completed sessions, oldest first
    History {
        /// How many days back to look
        #[arg(long, default_value = "7")]
        days: i64,
    },
}

fn print_event(event: &Event, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("failed to encode event: {e}"),
        }
        return;
    }

    match event {
        Event::PhaseChanged {
            phase: Phase::Complete,
            ..
        } => println!("Complete"),
        Event::PhaseChanged {
            phase: Phase::Break,
            duration_secs: Some(0),
            iteration,
            ..
        } => println!("Break {iteration} skipped"),
        Event::PhaseChanged {
            phase,
            iteration,
            duration_secs,
            ..
        } => println!(
            "{phase} {iteration} • {}",
            format_clock(duration_secs.unwrap_or(0))
        ),
        Event::Tick { remaining_secs } => println!("{}", format_clock(*remaining_secs)),
        Event::SessionCompleted { record } => println!(
            "Session complete: {} min studied over {} cycles",
            record.total_study_minutes, record.iterations
        ),
    }
}

/// Epoch ms `days` before `now`. A window reaching past chrono's range
/// covers all history.
fn history_since(now: DateTime<Utc>, days: i64) -> i64 {
    chrono::Duration::try_days(days.max(0))
        .and_then(|window| now.checked_sub_signed(window))
        .map_or(i64::MIN, |since| since.timestamp_millis())
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub fn run(
    action: FocusAction,
    user: &UserId,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        FocusAction::Start {
            study,
            break_minutes,
            iterations,
            json,
            tick_ms,
        } => {
            let session = config.focus.parse_session(
                study.as_deref(),
                break_minutes.as_deref(),
                iterations.as_deref(),
            );
            info!(?session, user = %user, "starting focus session");

            let printer = EventSink::new(move |event: Event| print_event(&event, json));
            let observer = Persisting::new(printer, &db, user.clone());
            let scheduler = IntervalScheduler::with_period(Duration::from_millis(tick_ms));
            let mut controller = FocusSessionController::new(scheduler, observer);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let outcome = runtime.block_on(async {
                controller.start(session);
                drive(&mut controller, ctrl_c()).await
            });

            if outcome == SessionOutcome::Cancelled && !json {
                println!("Session cancelled");
            }
        }
        FocusAction::History { days } => {
            let sessions = db.sessions_since(user, history_since(Utc::now(), days))?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn history_window_in_days() {
        let now = Utc.with_ymd_and_hms(2026, 5, 8, 12, 0, 0).unwrap();
        let week_ago = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(history_since(now, 7), week_ago.timestamp_millis());
        assert_eq!(history_since(now, -3), now.timestamp_millis());
    }

    #[test]
    fn oversized_window_covers_everything() {
        let now = Utc::now();
        assert_eq!(history_since(now, i64::MAX), i64::MIN);
        assert_eq!(history_since(now, 200_000_000), i64::MIN);
    }
}
