//! Property tests for the focus session state machine.

use proptest::prelude::*;
use studybuddy_core::events::Event;
use studybuddy_core::focus::{
    EventLog, FocusSessionController, ManualScheduler, Phase, SessionConfig, TickScheduler,
};

/// Tick until the scheduler disarms, with a safety bound.
fn run_to_end(c: &mut FocusSessionController<ManualScheduler, EventLog>) -> usize {
    let mut ticks = 0;
    while c.scheduler().is_armed() && ticks < 100_000 {
        c.tick();
        ticks += 1;
    }
    ticks
}

proptest! {
    #[test]
    fn phases_alternate_and_complete_once(
        study in 1i64..=3,
        brk in 0i64..=3,
        iterations in 1i64..=6,
    ) {
        let mut c = FocusSessionController::new(ManualScheduler::new(), EventLog::new());
        c.start(SessionConfig::normalized(study, brk, iterations));
        let ticks = run_to_end(&mut c);

        let mut expected = Vec::new();
        for _ in 0..iterations {
            expected.push(Phase::Study);
            expected.push(Phase::Break);
        }
        expected.push(Phase::Complete);

        let log = c.observer();
        prop_assert_eq!(log.phases(), expected);
        prop_assert_eq!(log.completions().len(), 1);
        prop_assert_eq!(ticks as i64, iterations * (study + brk) * 60);

        let record = log.completions()[0];
        prop_assert_eq!(record.total_study_minutes as i64, study * iterations);
        prop_assert_eq!(record.iterations as i64, iterations);
    }

    #[test]
    fn no_ticks_during_zero_length_break(
        study in 1i64..=2,
        iterations in 1i64..=4,
    ) {
        let mut c = FocusSessionController::new(ManualScheduler::new(), EventLog::new());
        c.start(SessionConfig::normalized(study, 0, iterations));
        run_to_end(&mut c);

        let mut in_break = false;
        for event in c.observer().events() {
            match event {
                Event::PhaseChanged { phase, .. } => in_break = *phase == Phase::Break,
                Event::Tick { .. } => prop_assert!(!in_break),
                Event::SessionCompleted { .. } => {}
            }
        }
    }

    #[test]
    fn reentry_after_completion_is_inert(extra in 1usize..50) {
        let mut c = FocusSessionController::new(ManualScheduler::new(), EventLog::new());
        c.start(SessionConfig::normalized(1, 0, 1));
        run_to_end(&mut c);
        let events = c.observer().events().len();

        for _ in 0..extra {
            c.tick();
        }
        c.cancel();

        prop_assert_eq!(c.observer().events().len(), events);
        prop_assert_eq!(c.observer().completions().len(), 1);
    }
}
