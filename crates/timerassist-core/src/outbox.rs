//! Side effects collected while handling one command or one job.
//!
//! Registry and sequencer operations never talk to the output sink or the
//! alert service directly. They append to an [`Outbox`], and the session
//! flushes it in order: lines to the sink, alert requests to the alert
//! service, events to subscribers.

use crate::alert::AlertRequest;
use crate::events::Event;

#[derive(Debug, Default)]
pub struct Outbox {
    lines: Vec<String>,
    alerts: Vec<AlertRequest>,
    events: Vec<Event>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a line for the output sink.
    pub fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn request(&mut self, request: AlertRequest) {
        self.alerts.push(request);
    }

    pub fn publish(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn alerts(&self) -> &[AlertRequest] {
        &self.alerts
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Remove and return the queued events, keeping lines and alerts.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.alerts.is_empty() && self.events.is_empty()
    }

    /// Move everything out, leaving this outbox empty.
    pub fn take(&mut self) -> Outbox {
        std::mem::take(self)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<AlertRequest>, Vec<Event>) {
        (self.lines, self.alerts, self.events)
    }
}
