use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the registry or sequencer produces an Event.
/// The session fans them out to subscribers; the sequencer listens for
/// `TimerCompleted` to chain regimen steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerCreated {
        name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// An alerting timer was re-created and restarted in place.
    TimerRefreshed {
        name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        name: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        name: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        name: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        name: String,
        at: DateTime<Utc>,
    },
    TimerDeleted {
        name: String,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the timer is now alerting.
    TimerCompleted {
        name: String,
        at: DateTime<Utc>,
    },
    TimersCleared {
        names: Vec<String>,
        at: DateTime<Utc>,
    },
    RegimenStarted {
        name: String,
        steps: usize,
        at: DateTime<Utc>,
    },
    RegimenStepStarted {
        regimen: String,
        timer: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    RegimenCompleted {
        name: String,
        at: DateTime<Utc>,
    },
    /// The active regimen was abandoned before its queue drained.
    RegimenStopped {
        name: String,
        remaining_steps: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Timer this event concerns, if any.
    pub fn timer_name(&self) -> Option<&str> {
        match self {
            Event::TimerCreated { name, .. }
            | Event::TimerRefreshed { name, .. }
            | Event::TimerStarted { name, .. }
            | Event::TimerPaused { name, .. }
            | Event::TimerResumed { name, .. }
            | Event::TimerStopped { name, .. }
            | Event::TimerDeleted { name, .. }
            | Event::TimerCompleted { name, .. } => Some(name),
            Event::RegimenStepStarted { timer, .. } => Some(timer),
            _ => None,
        }
    }
}
