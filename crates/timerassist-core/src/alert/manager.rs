use std::time::Duration;

use indexmap::IndexMap;

use super::{AlertService, AlertSettings};

/// Output device for alerts.
pub trait Notifier {
    /// Play one beep.
    fn beep(&mut self, settings: &AlertSettings);

    /// Show a desktop-style notification.
    fn notify(&mut self, title: &str, body: &str);
}

/// Notifier that does nothing. Useful for headless sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn beep(&mut self, _settings: &AlertSettings) {}

    fn notify(&mut self, _title: &str, _body: &str) {}
}

#[derive(Debug, Clone, Copy)]
struct ActiveAlert {
    started: Duration,
    next_beep: Duration,
}

/// Repeating beeps per alerting timer, driven by [`AlertService::poll`].
///
/// Starting an alert beeps once immediately; further beeps happen on polls
/// once `interval` has elapsed, until the alert is stopped or `alert_timeout`
/// runs out.
#[derive(Debug)]
pub struct AlertManager<N: Notifier> {
    notifier: N,
    settings: AlertSettings,
    active: IndexMap<String, ActiveAlert>,
    now: Duration,
}

impl<N: Notifier> AlertManager<N> {
    pub fn new(notifier: N, settings: AlertSettings) -> Self {
        Self {
            notifier,
            settings: settings.clamped(),
            active: IndexMap::new(),
            now: Duration::ZERO,
        }
    }

    pub fn settings(&self) -> &AlertSettings {
        &self.settings
    }

    /// One beep with the current settings, outside of any alert.
    pub fn test_beep(&mut self) {
        self.notifier.beep(&self.settings);
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn ring(&mut self, name: &str) {
        self.notifier.beep(&self.settings);
        self.active.insert(
            name.to_string(),
            ActiveAlert {
                started: self.now,
                next_beep: self.now + self.settings.beep_interval(),
            },
        );
    }
}

impl<N: Notifier> AlertService for AlertManager<N> {
    fn start_alert(&mut self, name: &str) {
        self.active.shift_remove(name);
        tracing::info!(timer = name, "alert started");
        self.notifier
            .notify("Timer Complete", &format!("Timer '{name}' has finished!"));
        self.ring(name);
    }

    fn stop_alert(&mut self, name: &str) {
        if self.active.shift_remove(name).is_some() {
            tracing::debug!(timer = name, "alert stopped");
        }
    }

    fn stop_all_alerts(&mut self) {
        if !self.active.is_empty() {
            tracing::debug!(count = self.active.len(), "all alerts stopped");
            self.active.clear();
        }
    }

    fn next_due(&self) -> Option<Duration> {
        let timeout = self.settings.timeout();
        self.active
            .values()
            .map(|alert| alert.next_beep.min(alert.started + timeout))
            .min()
    }

    fn apply_settings(&mut self, settings: &AlertSettings) {
        self.settings = settings.clamped();
        let names: Vec<String> = self.active.keys().cloned().collect();
        for name in names {
            tracing::debug!(timer = %name, "restarting alert with new settings");
            self.ring(&name);
        }
    }

    fn poll(&mut self, now: Duration) {
        self.now = self.now.max(now);
        let timeout = self.settings.timeout();
        let interval = self.settings.beep_interval();
        let now = self.now;

        self.active.retain(|name, alert| {
            if now.saturating_sub(alert.started) >= timeout {
                tracing::info!(timer = %name, "alert timed out");
                return false;
            }
            true
        });
        for alert in self.active.values_mut() {
            if alert.next_beep <= now {
                self.notifier.beep(&self.settings);
                alert.next_beep = now + interval;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recording {
        beeps: usize,
        notes: Vec<(String, String)>,
    }

    impl Notifier for Recording {
        fn beep(&mut self, _settings: &AlertSettings) {
            self.beeps += 1;
        }

        fn notify(&mut self, title: &str, body: &str) {
            self.notes.push((title.to_string(), body.to_string()));
        }
    }

    fn manager() -> AlertManager<Recording> {
        AlertManager::new(Recording::default(), AlertSettings::default())
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn start_notifies_and_beeps_immediately() {
        let mut m = manager();
        m.start_alert("tea");
        assert!(m.is_active("tea"));
        assert_eq!(m.notifier().beeps, 1);
        assert_eq!(
            m.notifier().notes,
            [("Timer Complete".to_string(), "Timer 'tea' has finished!".to_string())]
        );
    }

    #[test]
    fn beeps_repeat_on_interval() {
        let mut m = manager();
        m.start_alert("tea");
        m.poll(Duration::from_millis(500));
        assert_eq!(m.notifier().beeps, 1);
        m.poll(secs(1));
        assert_eq!(m.notifier().beeps, 2);
        m.poll(secs(2));
        assert_eq!(m.notifier().beeps, 3);
    }

    #[test]
    fn alert_times_out() {
        let mut m = AlertManager::new(
            Recording::default(),
            AlertSettings {
                alert_timeout: 3,
                ..AlertSettings::default()
            },
        );
        m.start_alert("tea");
        m.poll(secs(2));
        assert!(m.is_active("tea"));
        m.poll(secs(3));
        assert!(!m.is_active("tea"));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut m = manager();
        m.start_alert("a");
        m.start_alert("b");
        m.stop_alert("a");
        m.stop_alert("a");
        assert_eq!(m.active_names().collect::<Vec<_>>(), ["b"]);

        m.stop_all_alerts();
        m.stop_all_alerts();
        assert_eq!(m.active_names().count(), 0);
        m.poll(secs(10));
        assert_eq!(m.notifier().beeps, 2);
    }

    #[test]
    fn restarting_an_alert_replaces_it() {
        let mut m = manager();
        m.start_alert("tea");
        m.start_alert("tea");
        assert_eq!(m.active_names().count(), 1);
        assert_eq!(m.notifier().notes.len(), 2);
    }

    #[test]
    fn apply_settings_restarts_active_alerts() {
        let mut m = manager();
        m.start_alert("tea");
        m.poll(secs(5));
        let before = m.notifier().beeps;

        m.apply_settings(&AlertSettings {
            interval: 3.0,
            frequency: 1,
            ..AlertSettings::default()
        });
        assert_eq!(m.settings().frequency, 37);
        assert_eq!(m.notifier().beeps, before + 1);
        m.poll(secs(7));
        assert_eq!(m.notifier().beeps, before + 1);
        m.poll(secs(8));
        assert_eq!(m.notifier().beeps, before + 2);
    }

    #[test]
    fn test_beep_does_not_start_an_alert() {
        let mut m = manager();
        m.test_beep();
        assert_eq!(m.notifier().beeps, 1);
        assert_eq!(m.active_names().count(), 0);
    }

    #[test]
    fn next_due_tracks_the_earliest_beep() {
        let mut m = AlertManager::new(
            Recording::default(),
            AlertSettings {
                interval: 0.25,
                alert_timeout: 2,
                ..AlertSettings::default()
            },
        );
        assert_eq!(m.next_due(), None);

        m.start_alert("tea");
        assert_eq!(m.next_due(), Some(Duration::from_millis(250)));
        m.poll(Duration::from_millis(250));
        assert_eq!(m.notifier().beeps, 2);
        assert_eq!(m.next_due(), Some(Duration::from_millis(500)));

        m.poll(Duration::from_millis(1900));
        assert_eq!(m.next_due(), Some(secs(2)));
        m.poll(secs(2));
        assert_eq!(m.next_due(), None);
    }
}
