//! Focus session controller.
//!
//! A countdown state machine with one-second resolution. It owns no
//! thread and no timer of its own: a [`TickScheduler`] is armed for every
//! phase with a non-zero duration, and the host calls [`tick`] each time
//! that scheduler fires.
//!
//! ## State Transitions
//!
//! ```text
//! start -> Study -> Break -> Study -> ... -> Break -> Complete
//!            ^                                  |
//!            +---- iteration < iterations ------+
//! ```
//!
//! A zero-length break is entered and reported, then finished at once
//! without arming the scheduler.
//!
//! [`tick`]: FocusSessionController::tick

use chrono::Utc;
use tracing::{debug, info};

use super::config::SessionConfig;
use super::observer::SessionObserver;
use super::record::CompletionRecord;
use super::scheduler::TickScheduler;
use super::state::{Phase, PhaseChange, SessionState};

#[derive(Debug, Clone, Copy)]
struct Session {
    config: SessionConfig,
    state: SessionState,
    completion_emitted: bool,
}

/// Drives one focus session at a time.
#[derive(Debug)]
pub struct FocusSessionController<S, O> {
    scheduler: S,
    observer: O,
    session: Option<Session>,
}

impl<S: TickScheduler, O: SessionObserver> FocusSessionController<S, O> {
    pub fn new(scheduler: S, observer: O) -> Self {
        Self {
            scheduler,
            observer,
            session: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> Option<SessionState> {
        self.session.map(|s| s.state)
    }

    /// The normalized config of the current (or just completed) session.
    pub fn config(&self) -> Option<SessionConfig> {
        self.session.map(|s| s.config)
    }

    /// True while a Study or Break phase is counting down.
    pub fn is_active(&self) -> bool {
        self.session.is_some_and(|s| !s.state.is_complete())
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session. The config is normalized first; any session still
    /// running is abandoned without a completion record.
    pub fn start(&mut self, config: SessionConfig) {
        self.scheduler.disarm();
        if self.is_active() {
            debug!("abandoning running focus session");
        }

        let config = config.normalize();
        info!(
            study_minutes = config.study_minutes,
            break_minutes = config.break_minutes,
            iterations = config.iterations,
            "focus session started"
        );

        self.session = Some(Session {
            config,
            state: SessionState::first(config.study_secs()),
            completion_emitted: false,
        });
        self.enter_phase(Phase::Study);
    }

    /// Advance the countdown by one second.
    ///
    /// A tick that arrives after `cancel`, after completion or before
    /// `start` is ignored.
    pub fn tick(&mut self) {
        let remaining = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let state = &mut session.state;
            if state.is_complete() || state.remaining_secs == 0 {
                return;
            }
            state.remaining_secs -= 1;
            state.remaining_secs
        };

        self.observer.on_tick(remaining);

        if remaining == 0 {
            self.scheduler.disarm();
            self.finish_phase();
        }
    }

    /// Stop the countdown. No callback fires afterwards and no record is
    /// produced. A completed session is left as is.
    pub fn cancel(&mut self) {
        self.scheduler.disarm();
        if self.is_active() {
            if let Some(session) = self.session.take() {
                info!(
                    iteration = session.state.current_iteration,
                    phase = %session.state.phase,
                    "focus session cancelled"
                );
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_phase(&mut self, phase: Phase) {
        self.scheduler.disarm();

        let change = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let duration_secs = match phase {
                Phase::Study => session.config.study_secs(),
                Phase::Break => session.config.break_secs(),
                Phase::Complete => return,
            };
            session.state.phase = phase;
            session.state.remaining_secs = duration_secs;
            PhaseChange {
                phase,
                iteration: session.state.current_iteration,
                duration_secs: Some(duration_secs),
            }
        };

        debug!(
            phase = %change.phase,
            iteration = change.iteration,
            duration_secs = ?change.duration_secs,
            "entered phase"
        );
        self.observer.on_phase_change(change);

        if change.duration_secs == Some(0) {
            self.finish_phase();
        } else {
            self.scheduler.arm();
        }
    }

    fn finish_phase(&mut self) {
        let next = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            match session.state.phase {
                Phase::Study => Some(Phase::Break),
                Phase::Break if session.state.current_iteration < session.config.iterations => {
                    session.state.current_iteration += 1;
                    Some(Phase::Study)
                }
                Phase::Break => None,
                Phase::Complete => return,
            }
        };

        match next {
            Some(phase) => self.enter_phase(phase),
            None => self.complete(),
        }
    }

    fn complete(&mut self) {
        self.scheduler.disarm();

        let (record, iteration) = {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            if session.completion_emitted {
                return;
            }
            session.completion_emitted = true;
            session.state.phase = Phase::Complete;
            session.state.remaining_secs = 0;
            (
                CompletionRecord::new(&session.config, Utc::now()),
                session.state.current_iteration,
            )
        };

        info!(
            total_study_minutes = record.total_study_minutes,
            iterations = record.iterations,
            "focus session complete"
        );
        self.observer.on_phase_change(PhaseChange {
            phase: Phase::Complete,
            iteration,
            duration_secs: None,
        });
        self.observer.on_complete(record);
    }
}
