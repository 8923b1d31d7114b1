//! Async host loop for a controller backed by [`IntervalScheduler`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::controller::FocusSessionController;
use super::observer::SessionObserver;
use super::scheduler::IntervalScheduler;

/// How a driven session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

enum Step {
    Tick,
    Idle,
    Shutdown,
}

/// Feed interval ticks into `controller` until the session completes or
/// `shutdown` resolves, whichever comes first. On shutdown the controller
/// is cancelled before returning.
///
/// The controller should already be started; an idle controller returns
/// `Cancelled` straight away.
pub async fn drive<O, F>(
    controller: &mut FocusSessionController<IntervalScheduler, O>,
    shutdown: F,
) -> SessionOutcome
where
    O: SessionObserver,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let step = tokio::select! {
            biased;
            _ = &mut shutdown => Step::Shutdown,
            armed = controller.scheduler_mut().next_tick() => {
                if armed { Step::Tick } else { Step::Idle }
            }
        };

        match step {
            Step::Tick => controller.tick(),
            Step::Idle => {
                let completed = controller.state().is_some_and(|s| s.is_complete());
                return if completed {
                    SessionOutcome::Completed
                } else {
                    SessionOutcome::Cancelled
                };
            }
            Step::Shutdown => {
                debug!("shutdown requested, cancelling focus session");
                controller.cancel();
                return SessionOutcome::Cancelled;
            }
        }
    }
}
