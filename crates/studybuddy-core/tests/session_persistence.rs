//! End-to-end: a driven session lands in SQLite and shows up in the
//! weekly summary.

use std::time::Duration;

use chrono::Utc;
use studybuddy_core::focus::{
    drive, EventLog, FocusSessionController, IntervalScheduler, Persisting, SessionConfig,
    SessionOutcome, SessionRepository,
};
use studybuddy_core::stats::weekly_focus;
use studybuddy_core::{Database, UserId};

#[tokio::test(start_paused = true)]
async fn completed_session_is_saved_for_user() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("studybuddy.db")).unwrap();
    let user = UserId::new("student-1");

    let observer = Persisting::new(EventLog::new(), &db, user.clone());
    let mut c = FocusSessionController::new(IntervalScheduler::new(), observer);
    c.start(SessionConfig::normalized(1, 0, 2));

    let outcome = drive(&mut c, std::future::pending()).await;
    assert_eq!(outcome, SessionOutcome::Completed);

    let observer = c.into_observer();
    assert!(observer.saved_id().is_some());
    assert_eq!(observer.inner().completions().len(), 1);

    let saved = db.query_recent(&user, 0).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].total_study_minutes, 2);
    assert_eq!(saved[0].iterations, 2);
    assert_eq!(saved[0].study_minutes_per_cycle, 1);
    assert_eq!(saved[0].break_minutes_per_cycle, 0);

    let week = weekly_focus(&db, &user, Utc::now());
    assert_eq!(week.total_minutes, 2);
    assert_eq!(week.flowers, 0);
    assert!(db.query_recent(&UserId::new("someone-else"), 0).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_session_saves_nothing() {
    let db = Database::open_in_memory().unwrap();
    let user = UserId::new("student-1");

    let observer = Persisting::new(EventLog::new(), &db, user.clone());
    let mut c = FocusSessionController::new(IntervalScheduler::new(), observer);
    c.start(SessionConfig::normalized(1, 1, 1));

    let outcome = drive(&mut c, tokio::time::sleep(Duration::from_millis(90_500))).await;
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(c.observer().inner().tick_count(), 90);
    assert_eq!(db.session_count(&user).unwrap(), 0);
}
