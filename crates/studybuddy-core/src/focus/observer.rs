//! Callbacks fired by the focus session controller.

use crate::events::Event;

use super::record::CompletionRecord;
use super::state::{Phase, PhaseChange};

/// Receives tick, phase and completion notifications.
///
/// All methods default to no-ops so observers only implement what they
/// need.
pub trait SessionObserver {
    /// Once per elapsed second of an active phase.
    fn on_tick(&mut self, _remaining_secs: u64) {}

    /// On every phase transition, including the initial `Study`.
    fn on_phase_change(&mut self, _change: PhaseChange) {}

    /// Exactly once per session, after the last break.
    fn on_complete(&mut self, _record: CompletionRecord) {}
}

impl SessionObserver for () {}

impl<O: SessionObserver + ?Sized> SessionObserver for Box<O> {
    fn on_tick(&mut self, remaining_secs: u64) {
        (**self).on_tick(remaining_secs);
    }

    fn on_phase_change(&mut self, change: PhaseChange) {
        (**self).on_phase_change(change);
    }

    fn on_complete(&mut self, record: CompletionRecord) {
        (**self).on_complete(record);
    }
}

/// Forwards every callback as an [`Event`] to a closure.
pub struct EventSink<F> {
    emit: F,
}

impl<F: FnMut(Event)> EventSink<F> {
    pub fn new(emit: F) -> Self {
        Self { emit }
    }
}

impl<F: FnMut(Event)> SessionObserver for EventSink<F> {
    fn on_tick(&mut self, remaining_secs: u64) {
        (self.emit)(Event::Tick { remaining_secs });
    }

    fn on_phase_change(&mut self, change: PhaseChange) {
        (self.emit)(Event::phase_changed(change));
    }

    fn on_complete(&mut self, record: CompletionRecord) {
        (self.emit)(Event::SessionCompleted { record });
    }
}

/// Collects every callback as an [`Event`].
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Phases in the order they were entered.
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::PhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    pub fn tick_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Tick { .. }))
            .count()
    }

    pub fn completions(&self) -> Vec<CompletionRecord> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::SessionCompleted { record } => Some(*record),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for EventLog {
    fn on_tick(&mut self, remaining_secs: u64) {
        self.events.push(Event::Tick { remaining_secs });
    }

    fn on_phase_change(&mut self, change: PhaseChange) {
        self.events.push(Event::phase_changed(change));
    }

    fn on_complete(&mut self, record: CompletionRecord) {
        self.events.push(Event::SessionCompleted { record });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::SessionConfig;
    use chrono::Utc;

    #[test]
    fn event_sink_maps_callbacks_to_events() {
        let mut seen = Vec::new();
        {
            let mut sink = EventSink::new(|e| seen.push(e));
            sink.on_phase_change(PhaseChange {
                phase: Phase::Study,
                iteration: 1,
                duration_secs: Some(60),
            });
            sink.on_tick(59);
            sink.on_complete(CompletionRecord::new(&SessionConfig::default(), Utc::now()));
        }
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], Event::PhaseChanged { phase: Phase::Study, .. }));
        assert_eq!(seen[1], Event::Tick { remaining_secs: 59 });
        assert!(matches!(seen[2], Event::SessionCompleted { .. }));
    }

    #[test]
    fn boxed_observer_forwards() {
        let mut boxed: Box<EventLog> = Box::default();
        boxed.on_tick(3);
        assert_eq!(boxed.tick_count(), 1);
    }
}
