//! Event subscribers.
//!
//! The session hands every published [`Event`] to the regimen sequencer
//! first and then to each registered [`Subscribe`] implementation, in
//! registration order, on the same thread.

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe {
    fn on_event(&mut self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Traces every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubscriber;

impl LogSubscriber {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogSubscriber {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::TimerCreated {
                name,
                duration_secs,
                ..
            } => tracing::info!(timer = %name, duration_secs, "[created]"),
            Event::TimerRefreshed {
                name,
                duration_secs,
                ..
            } => tracing::info!(timer = %name, duration_secs, "[refreshed]"),
            Event::TimerStarted {
                name,
                remaining_secs,
                ..
            } => tracing::debug!(timer = %name, remaining_secs, "[started]"),
            Event::TimerPaused {
                name,
                remaining_secs,
                ..
            } => tracing::debug!(timer = %name, remaining_secs, "[paused]"),
            Event::TimerResumed {
                name,
                remaining_secs,
                ..
            } => tracing::debug!(timer = %name, remaining_secs, "[resumed]"),
            Event::TimerStopped { name, .. } => tracing::debug!(timer = %name, "[stopped]"),
            Event::TimerDeleted { name, .. } => tracing::debug!(timer = %name, "[deleted]"),
            Event::TimerCompleted { name, .. } => tracing::info!(timer = %name, "[completed]"),
            Event::TimersCleared { names, .. } => {
                tracing::info!(count = names.len(), "[cleared]")
            }
            Event::RegimenStarted { name, steps, .. } => {
                tracing::info!(regimen = %name, steps, "[regimen-started]")
            }
            Event::RegimenStepStarted {
                regimen,
                timer,
                duration_secs,
                ..
            } => tracing::debug!(regimen = %regimen, timer = %timer, duration_secs, "[regimen-step]"),
            Event::RegimenCompleted { name, .. } => {
                tracing::info!(regimen = %name, "[regimen-completed]")
            }
            Event::RegimenStopped {
                name,
                remaining_steps,
                ..
            } => tracing::info!(regimen = %name, remaining_steps, "[regimen-stopped]"),
        }
    }
}
