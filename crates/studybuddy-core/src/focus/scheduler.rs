//! Tick sources for the focus session controller.
//!
//! The controller never sleeps. It asks its scheduler to arm or disarm a
//! repeating one-second tick, and the host calls
//! [`FocusSessionController::tick`](super::FocusSessionController::tick)
//! whenever that tick fires.

use std::time::Duration;

use tokio::time::{self, Instant, Interval};

/// A repeating 1 Hz timer the controller can arm and disarm.
///
/// Arming an armed scheduler replaces the running timer; at most one is
/// ever active.
pub trait TickScheduler {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

/// Caller-driven scheduler. Records arm/disarm calls and leaves the
/// actual ticking to whoever owns the controller.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    armed: bool,
    arm_count: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a timer was (re)armed.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self) {
        self.armed = true;
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Tokio-backed scheduler.
///
/// Must be armed from inside a tokio runtime. The first tick fires one
/// period after arming.
const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(3600);

#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// A scheduler whose "second" lasts `period`, clamped to 1 ms..=1 h.
    /// Used to speed up demos and tests; session semantics are unchanged.
    pub fn with_period(period: Duration) -> Self {
        let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick. Returns `false` immediately when disarmed.
    pub async fn next_tick(&mut self) -> bool {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                true
            }
            None => false,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for IntervalScheduler {
    fn arm(&mut self) {
        self.interval = Some(time::interval_at(Instant::now() + self.period, self.period));
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_arming() {
        let mut s = ManualScheduler::new();
        assert!(!s.is_armed());
        s.arm();
        s.arm();
        assert!(s.is_armed());
        assert_eq!(s.arm_count(), 2);
        s.disarm();
        assert!(!s.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_scheduler_waits_one_period() {
        let mut s = IntervalScheduler::new();
        assert!(!s.next_tick().await);

        s.arm();
        let before = Instant::now();
        assert!(s.next_tick().await);
        assert_eq!(before.elapsed(), Duration::from_secs(1));

        s.disarm();
        assert!(!s.next_tick().await);
    }

    #[test]
    fn zero_period_is_clamped() {
        let s = IntervalScheduler::with_period(Duration::ZERO);
        assert_eq!(s.period(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn huge_period_is_clamped_and_arms() {
        let mut s = IntervalScheduler::with_period(Duration::from_millis(u64::MAX));
        assert_eq!(s.period(), Duration::from_secs(3600));
        s.arm();
        assert!(s.is_armed());
    }
}
