//! Named countdown timers and their lifecycle.
//!
//! ## State Transitions
//!
//! ```text
//! Created -> Running -> (Paused <-> Running) -> Alerting -> Stopped (reset)
//!                 any state --delete--> gone
//! ```
//!
//! Each running timer owns two scheduler jobs: a `Tick` every second that
//! counts down and prints the display string when it changes, and a
//! `CompletionWatch` (first check two seconds after start, then every second)
//! that asks the alert service to start once the countdown hits zero. Both are
//! cancelled on stop, delete, clear and refresh; a job that fires with an id
//! the timer no longer holds is ignored.

use std::time::Duration;

use chrono::Utc;
use indexmap::IndexMap;

use super::entity::{format_time, Timer};
use super::scheduler::{Job, JobId, Scheduler};
use crate::alert::AlertRequest;
use crate::error::TimerError;
use crate::events::Event;
use crate::outbox::Outbox;

const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Arming delay plus the first one-second check interval.
const FIRST_WATCH: Duration = Duration::from_secs(2);

type Result<T> = std::result::Result<T, TimerError>;

/// Owns every timer, keyed by exact name, in creation order.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: IndexMap<String, Timer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Option<&Timer> {
        self.timers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.values()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create and start a timer.
    ///
    /// Re-creating a timer that is alerting restarts it in place with the new
    /// duration instead of failing.
    pub fn create(
        &mut self,
        name: &str,
        duration_secs: u64,
        sched: &mut Scheduler,
        out: &mut Outbox,
    ) -> Result<()> {
        if duration_secs == 0 {
            return Err(TimerError::InvalidDuration {
                name: name.to_string(),
                secs: duration_secs,
            });
        }

        if let Some(timer) = self.timers.get_mut(name) {
            if !timer.is_alerting() {
                return Err(TimerError::AlreadyExists(name.to_string()));
            }
            timer.take_alerting();
            out.request(AlertRequest::Stop(name.to_string()));
            timer.reset(duration_secs);
            timer.set_running(true);
            timer.set_paused(false);
            arm(timer, sched);
            tracing::info!(timer = name, duration_secs, "timer refreshed");
            out.say(format!("Refreshed timer '{name}' ({})", format_time(duration_secs)));
            out.publish(Event::TimerRefreshed {
                name: name.to_string(),
                duration_secs,
                at: Utc::now(),
            });
            return Ok(());
        }

        let timer = Timer::new(name, duration_secs);
        let display = format_time(duration_secs);
        self.timers.insert(name.to_string(), timer);
        tracing::info!(timer = name, duration_secs, "timer created");
        out.say(format!("Created timer '{name}' ({display})"));
        out.say(format!("[{name}]: {display}"));
        out.publish(Event::TimerCreated {
            name: name.to_string(),
            duration_secs,
            at: Utc::now(),
        });

        self.start(name, sched, out)
    }

    pub fn start(&mut self, name: &str, sched: &mut Scheduler, out: &mut Outbox) -> Result<()> {
        let timer = self.lookup(name)?;
        if timer.is_running() {
            out.say(format!("Timer '{name}' is already running"));
            return Ok(());
        }
        if timer.take_alerting() {
            out.request(AlertRequest::Stop(name.to_string()));
        }
        timer.set_running(true);
        timer.set_paused(false);
        arm(timer, sched);
        out.publish(Event::TimerStarted {
            name: name.to_string(),
            remaining_secs: timer.remaining_secs(),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn pause(&mut self, name: &str, out: &mut Outbox) -> Result<()> {
        let timer = self.lookup(name)?;
        if !timer.is_running() {
            out.say(format!("Timer '{name}' is not running"));
            return Ok(());
        }
        timer.set_paused(true);
        out.say(timer.status_line());
        if timer.take_alerting() {
            out.request(AlertRequest::Stop(name.to_string()));
        }
        out.publish(Event::TimerPaused {
            name: name.to_string(),
            remaining_secs: timer.remaining_secs(),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn resume(&mut self, name: &str, out: &mut Outbox) -> Result<()> {
        let timer = self.lookup(name)?;
        if !timer.is_running() {
            out.say(format!("Timer '{name}' is not running"));
            return Ok(());
        }
        if timer.take_alerting() {
            out.request(AlertRequest::Stop(name.to_string()));
        }
        timer.set_paused(false);
        out.say(timer.status_line());
        out.publish(Event::TimerResumed {
            name: name.to_string(),
            remaining_secs: timer.remaining_secs(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// Halt and rewind a timer. It stays registered.
    pub fn stop(&mut self, name: &str, sched: &mut Scheduler, out: &mut Outbox) -> Result<()> {
        let timer = self.lookup(name)?;
        timer.set_running(false);
        disarm(timer, sched);
        timer.rewind();
        if timer.take_alerting() {
            out.request(AlertRequest::Stop(name.to_string()));
        }
        tracing::info!(timer = name, "timer stopped");
        out.say(format!("Stopped timer '{name}'"));
        // The display layer keys timer removal off this line.
        out.say(format!("[{name}]: Complete!"));
        out.publish(Event::TimerStopped {
            name: name.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn delete(&mut self, name: &str, sched: &mut Scheduler, out: &mut Outbox) -> Result<()> {
        self.stop(name, sched, out)?;
        self.timers.shift_remove(name);
        tracing::info!(timer = name, "timer deleted");
        out.say(format!("Deleted timer '{name}'"));
        out.publish(Event::TimerDeleted {
            name: name.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// One status line per running timer.
    pub fn list(&self, out: &mut Outbox) {
        if self.timers.is_empty() {
            out.say("No active timers");
            return;
        }
        for timer in self.timers.values().filter(|t| t.is_running()) {
            out.say(timer.status_line());
        }
    }

    /// Stop every alert, then stop (but keep) every timer.
    pub fn stop_all(&mut self, sched: &mut Scheduler, out: &mut Outbox) {
        out.request(AlertRequest::StopAll);
        let names: Vec<String> = self.timers.keys().cloned().collect();
        for name in names {
            // Every name comes from the map, so stop cannot miss.
            let _ = self.stop(&name, sched, out);
        }
    }

    /// Remove every timer.
    pub fn clear_all(&mut self, sched: &mut Scheduler, out: &mut Outbox) {
        if self.timers.is_empty() {
            out.say("No timers to clear");
            return;
        }
        out.request(AlertRequest::StopAll);
        for timer in self.timers.values_mut() {
            timer.set_running(false);
            disarm(timer, sched);
        }
        let names: Vec<String> = self.timers.drain(..).map(|(name, _)| name).collect();
        tracing::info!(count = names.len(), "timers cleared");
        out.say(format!(
            "Cleared {} timer(s): {}",
            names.len(),
            names.join(", ")
        ));
        out.publish(Event::TimersCleared {
            names,
            at: Utc::now(),
        });
    }

    // ── Scheduled jobs ───────────────────────────────────────────────

    /// Handle a `Tick` job for `name`.
    pub fn on_tick(&mut self, name: &str, job: JobId, sched: &mut Scheduler, out: &mut Outbox) {
        let Some(timer) = self.timers.get_mut(name) else {
            return;
        };
        if timer.tick_job != Some(job) {
            tracing::warn!(timer = name, ?job, "stale tick dropped");
            return;
        }
        timer.tick_job = None;
        if !timer.is_running() {
            return;
        }

        if timer.remaining_secs() > 0 {
            if !timer.is_paused() {
                let display = timer.status_line();
                if display != timer.last_display {
                    out.say(display.clone());
                    timer.last_display = display;
                }
                timer.count_down();
            }
            timer.tick_job = Some(sched.schedule_in(TICK_PERIOD, Job::Tick { timer: name.to_string() }));
        } else {
            timer.mark_alerting();
            tracing::info!(timer = name, "timer completed");
            out.say(format!("[{name}]: Complete!"));
            out.publish(Event::TimerCompleted {
                name: name.to_string(),
                at: Utc::now(),
            });
        }
    }

    /// Handle a `CompletionWatch` job for `name`.
    pub fn on_completion_watch(
        &mut self,
        name: &str,
        job: JobId,
        sched: &mut Scheduler,
        out: &mut Outbox,
    ) {
        let Some(timer) = self.timers.get_mut(name) else {
            return;
        };
        if timer.watch_job != Some(job) {
            return;
        }
        timer.watch_job = None;

        let finished = timer.remaining_secs() == 0;
        if finished || !timer.is_running() {
            if finished && timer.is_running() {
                out.request(AlertRequest::Start(name.to_string()));
            }
            return;
        }
        timer.watch_job = Some(sched.schedule_in(
            TICK_PERIOD,
            Job::CompletionWatch {
                timer: name.to_string(),
            },
        ));
    }

    fn lookup(&mut self, name: &str) -> Result<&mut Timer> {
        self.timers
            .get_mut(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))
    }
}

/// (Re)start the countdown and completion watch for a running timer.
fn arm(timer: &mut Timer, sched: &mut Scheduler) {
    disarm(timer, sched);
    timer.last_display.clear();
    let name = timer.name().to_string();
    timer.tick_job = Some(sched.schedule_in(TICK_PERIOD, Job::Tick { timer: name.clone() }));
    timer.watch_job = Some(sched.schedule_in(FIRST_WATCH, Job::CompletionWatch { timer: name }));
}

fn disarm(timer: &mut Timer, sched: &mut Scheduler) {
    if let Some(job) = timer.tick_job.take() {
        sched.cancel(job);
    }
    if let Some(job) = timer.watch_job.take() {
        sched.cancel(job);
    }
}
