use serde::{Deserialize, Serialize};

use super::scheduler::JobId;

/// Coarse display state of a timer, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown finished; waiting for the user to stop, pause, resume or
    /// re-create it.
    Alerting,
}

/// A named countdown.
///
/// Only the [`TimerRegistry`](super::TimerRegistry) mutates timers; everyone
/// else gets shared references.
#[derive(Debug, Clone, Serialize)]
pub struct Timer {
    name: String,
    duration_secs: u64,
    remaining_secs: u64,
    running: bool,
    paused: bool,
    alerting: bool,
    /// Last `[name]: ...` string emitted by the current run.
    #[serde(skip)]
    pub(super) last_display: String,
    #[serde(skip)]
    pub(super) tick_job: Option<JobId>,
    #[serde(skip)]
    pub(super) watch_job: Option<JobId>,
}

impl Timer {
    pub(super) fn new(name: &str, duration_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            paused: false,
            alerting: false,
            last_display: String::new(),
            tick_job: None,
            watch_job: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_alerting(&self) -> bool {
        self.alerting
    }

    pub fn state(&self) -> TimerState {
        if self.alerting {
            TimerState::Alerting
        } else if !self.running {
            TimerState::Idle
        } else if self.paused {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// `"[name]: 2m"` style status line for the current remaining time.
    pub fn status_line(&self) -> String {
        format!("[{}]: {}", self.name, format_time(self.remaining_secs))
    }

    // ── Transitions (registry only) ──────────────────────────────────

    pub(super) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub(super) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Clear the alerting flag, returning whether it was set.
    pub(super) fn take_alerting(&mut self) -> bool {
        std::mem::replace(&mut self.alerting, false)
    }

    pub(super) fn mark_alerting(&mut self) {
        self.alerting = true;
    }

    pub(super) fn reset(&mut self, duration_secs: u64) {
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
    }

    pub(super) fn rewind(&mut self) {
        self.remaining_secs = self.duration_secs;
    }

    pub(super) fn count_down(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }
}

/// Coarse remaining-time display: whole minutes when at least one minute is
/// left, seconds below that, `"0m"` when done. 90 seconds shows as `"1m"`.
pub fn format_time(seconds: u64) -> String {
    if seconds == 0 {
        return "0m".to_string();
    }
    let minutes = seconds / 60;
    if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn format_examples() {
        assert_eq!(format_time(0), "0m");
        assert_eq!(format_time(45), "45s");
        assert_eq!(format_time(60), "1m");
        assert_eq!(format_time(90), "1m");
        assert_eq!(format_time(125), "2m");
        assert_eq!(format_time(3600), "60m");
    }

    #[test]
    fn state_follows_flags() {
        let mut timer = Timer::new("tea", 30);
        assert_eq!(timer.state(), TimerState::Idle);
        timer.set_running(true);
        assert_eq!(timer.state(), TimerState::Running);
        timer.set_paused(true);
        assert_eq!(timer.state(), TimerState::Paused);
        timer.mark_alerting();
        assert_eq!(timer.state(), TimerState::Alerting);
        assert!(timer.take_alerting());
        assert!(!timer.take_alerting());
    }

    proptest! {
        #[test]
        fn minutes_drop_the_seconds_component(secs in 60u64..1_000_000) {
            prop_assert_eq!(format_time(secs), format!("{}m", secs / 60));
        }

        #[test]
        fn under_a_minute_shows_seconds(secs in 1u64..60) {
            prop_assert_eq!(format_time(secs), format!("{secs}s"));
        }
    }
}
