//! Persistence seam for completed focus sessions.

use tracing::{debug, warn};

use crate::error::Result;
use crate::user::UserId;

use super::observer::SessionObserver;
use super::record::CompletionRecord;
use super::state::PhaseChange;

/// Storage for completion records, scoped per user.
pub trait SessionRepository {
    /// Store a record, returning its storage id.
    fn save(&self, user: &UserId, record: &CompletionRecord) -> Result<i64>;

    /// Records completed at or after `since_epoch_ms`, oldest first.
    fn query_recent(&self, user: &UserId, since_epoch_ms: i64) -> Result<Vec<CompletionRecord>>;
}

impl<R: SessionRepository + ?Sized> SessionRepository for &R {
    fn save(&self, user: &UserId, record: &CompletionRecord) -> Result<i64> {
        (**self).save(user, record)
    }

    fn query_recent(&self, user: &UserId, since_epoch_ms: i64) -> Result<Vec<CompletionRecord>> {
        (**self).query_recent(user, since_epoch_ms)
    }
}

/// Observer wrapper that saves the completion record before forwarding
/// it to `inner`.
///
/// Saving is fire-and-forget: a failure is logged, never retried, and the
/// session still counts as complete.
pub struct Persisting<O, R> {
    inner: O,
    repo: R,
    user: UserId,
    saved_id: Option<i64>,
}

impl<O, R: SessionRepository> Persisting<O, R> {
    pub fn new(inner: O, repo: R, user: UserId) -> Self {
        Self {
            inner,
            repo,
            user,
            saved_id: None,
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Storage id of the saved record, if the save succeeded.
    pub fn saved_id(&self) -> Option<i64> {
        self.saved_id
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}

impl<O: SessionObserver, R: SessionRepository> SessionObserver for Persisting<O, R> {
    fn on_tick(&mut self, remaining_secs: u64) {
        self.inner.on_tick(remaining_secs);
    }

    fn on_phase_change(&mut self, change: PhaseChange) {
        self.inner.on_phase_change(change);
    }

    fn on_complete(&mut self, record: CompletionRecord) {
        match self.repo.save(&self.user, &record) {
            Ok(id) => {
                debug!(id, user = %self.user, "saved focus session");
                self.saved_id = Some(id);
            }
            Err(e) => warn!(user = %self.user, "failed to save focus session: {e}"),
        }
        self.inner.on_complete(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatabaseError};
    use crate::focus::{EventLog, FocusSessionController, ManualScheduler, SessionConfig};
    use crate::focus::scheduler::TickScheduler;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryRepo {
        saved: RefCell<Vec<(UserId, CompletionRecord)>>,
        fail: bool,
    }

    impl SessionRepository for MemoryRepo {
        fn save(&self, user: &UserId, record: &CompletionRecord) -> Result<i64> {
            if self.fail {
                return Err(CoreError::Database(DatabaseError::Locked));
            }
            let mut saved = self.saved.borrow_mut();
            saved.push((user.clone(), *record));
            Ok(saved.len() as i64)
        }

        fn query_recent(&self, user: &UserId, since: i64) -> Result<Vec<CompletionRecord>> {
            Ok(self
                .saved
                .borrow()
                .iter()
                .filter(|(u, r)| u == user && r.completed_at_epoch_ms >= since)
                .map(|(_, r)| *r)
                .collect())
        }
    }

    fn run(repo: &MemoryRepo) -> Persisting<EventLog, &MemoryRepo> {
        let observer = Persisting::new(EventLog::new(), repo, UserId::new("u1"));
        let mut c = FocusSessionController::new(ManualScheduler::new(), observer);
        c.start(SessionConfig::normalized(1, 0, 2));
        while c.scheduler().is_armed() {
            c.tick();
        }
        c.into_observer()
    }

    #[test]
    fn saves_once_for_the_given_user() {
        let repo = MemoryRepo::default();
        let observer = run(&repo);

        assert_eq!(observer.saved_id(), Some(1));
        let saved = repo.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, UserId::new("u1"));
        assert_eq!(saved[0].1.total_study_minutes, 2);
        assert_eq!(observer.inner().completions().len(), 1);
    }

    #[test]
    fn save_failure_still_forwards_completion() {
        let repo = MemoryRepo {
            fail: true,
            ..Default::default()
        };
        let observer = run(&repo);

        assert_eq!(observer.saved_id(), None);
        assert_eq!(observer.inner().completions().len(), 1);
    }

    #[test]
    fn query_is_scoped_by_user() {
        let repo = MemoryRepo::default();
        run(&repo);
        assert_eq!(repo.query_recent(&UserId::new("u1"), 0).unwrap().len(), 1);
        assert!(repo.query_recent(&UserId::new("u2"), 0).unwrap().is_empty());
    }
}
