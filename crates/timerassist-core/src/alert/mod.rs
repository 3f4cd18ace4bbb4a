//! Alert contract and the default beeping implementation.
//!
//! The registry never calls an alert service directly; it queues
//! [`AlertRequest`]s in the outbox and the session applies them in order.

mod manager;
mod settings;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use manager::{AlertManager, Notifier, SilentNotifier};
pub use settings::AlertSettings;

/// A deferred call on the [`AlertService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "timer")]
pub enum AlertRequest {
    Start(String),
    Stop(String),
    StopAll,
}

/// Something that can make noise about finished timers.
///
/// `stop_alert` and `stop_all_alerts` must be idempotent.
pub trait AlertService {
    fn start_alert(&mut self, name: &str);

    fn stop_alert(&mut self, name: &str);

    fn stop_all_alerts(&mut self);

    /// Clock hook, called with the session's current virtual time.
    fn poll(&mut self, _now: Duration) {}

    /// Earliest virtual time at which `poll` has work to do, if any.
    fn next_due(&self) -> Option<Duration> {
        None
    }

    /// Replace the beep settings. Active alerts restart with them.
    fn apply_settings(&mut self, _settings: &AlertSettings) {}

    fn apply(&mut self, request: &AlertRequest) {
        match request {
            AlertRequest::Start(name) => self.start_alert(name),
            AlertRequest::Stop(name) => self.stop_alert(name),
            AlertRequest::StopAll => self.stop_all_alerts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<String>);

    impl AlertService for Calls {
        fn start_alert(&mut self, name: &str) {
            self.0.push(format!("start {name}"));
        }

        fn stop_alert(&mut self, name: &str) {
            self.0.push(format!("stop {name}"));
        }

        fn stop_all_alerts(&mut self) {
            self.0.push("stop all".into());
        }
    }

    #[test]
    fn apply_routes_requests() {
        let mut calls = Calls::default();
        calls.apply(&AlertRequest::Start("tea".into()));
        calls.apply(&AlertRequest::Stop("tea".into()));
        calls.apply(&AlertRequest::StopAll);
        assert_eq!(calls.0, ["start tea", "stop tea", "stop all"]);
    }

    #[test]
    fn request_json_shape() {
        let json = serde_json::to_value(AlertRequest::Start("tea".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Start", "timer": "tea"}));
    }
}
