//! Runs one regimen at a time as a chain of registry timers.
//!
//! A regimen step named `jog` in regimen `workout` becomes the timer
//! `workout_jog`. When a timer with the active regimen's prefix completes the
//! sequencer waits [`ADVANCE_DELAY`] and starts the next step. The regimen
//! ends once the queue is drained.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use super::store::{RegimenStep, RegimenStore, Regimens};
use crate::error::RegimenError;
use crate::events::Event;
use crate::outbox::Outbox;
use crate::timer::{Job, JobId, Scheduler, TimerRegistry};

/// Pause between one step completing and the next starting.
pub const ADVANCE_DELAY: Duration = Duration::from_secs(1);

type Result<T> = std::result::Result<T, RegimenError>;

/// Snapshot of the running regimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimenStatus {
    pub name: String,
    /// Steps not started yet.
    pub remaining: usize,
    pub total: usize,
}

#[derive(Debug)]
struct ActiveRegimen {
    name: String,
    queue: VecDeque<RegimenStep>,
    total: usize,
    advance_job: Option<JobId>,
}

pub struct RegimenSequencer {
    store: Box<dyn RegimenStore>,
    active: Option<ActiveRegimen>,
}

impl std::fmt::Debug for RegimenSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegimenSequencer")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl RegimenSequencer {
    pub fn new(store: Box<dyn RegimenStore>) -> Self {
        Self {
            store,
            active: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Name of the running regimen.
    pub fn current(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    pub fn status(&self) -> Option<RegimenStatus> {
        self.active.as_ref().map(|a| RegimenStatus {
            name: a.name.clone(),
            remaining: a.queue.len(),
            total: a.total,
        })
    }

    pub fn regimens(&self) -> Result<Regimens> {
        self.store.load()
    }

    pub fn regimen(&self, name: &str) -> Result<Option<Vec<RegimenStep>>> {
        Ok(self.store.load()?.shift_remove(name))
    }

    /// `false` when the store cannot be read.
    pub fn regimen_exists(&self, name: &str) -> bool {
        self.store
            .load()
            .map(|r| r.contains_key(name))
            .unwrap_or(false)
    }

    // ── Stored regimens ──────────────────────────────────────────────

    /// Validate and store a regimen, replacing any with the same name.
    ///
    /// Names are lowercased so that typed commands, which are matched in
    /// lowercase, can find them.
    pub fn create_regimen(
        &mut self,
        name: &str,
        steps: Vec<RegimenStep>,
        out: &mut Outbox,
    ) -> Result<()> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(RegimenError::InvalidRegimen(
                "regimen name must not be empty".into(),
            ));
        }
        if steps.is_empty() {
            return Err(RegimenError::InvalidRegimen(format!(
                "regimen '{name}' needs at least one timer"
            )));
        }
        let mut normalized = Vec::with_capacity(steps.len());
        for step in steps {
            let step_name = step.name.trim().to_lowercase();
            if step_name.is_empty() {
                return Err(RegimenError::InvalidRegimen(format!(
                    "regimen '{name}' has a timer without a name"
                )));
            }
            if step.duration == 0 {
                return Err(RegimenError::InvalidRegimen(format!(
                    "timer '{step_name}' in regimen '{name}' needs a positive duration"
                )));
            }
            normalized.push(RegimenStep::new(step_name, step.duration));
        }

        let mut regimens = self.store.load()?;
        let count = normalized.len();
        regimens.insert(name.clone(), normalized);
        self.store.save(&regimens)?;
        tracing::info!(regimen = %name, steps = count, "regimen saved");
        out.say(format!("Created regimen '{name}' with {count} timer(s)"));
        Ok(())
    }

    pub fn delete_regimen(&mut self, name: &str, out: &mut Outbox) -> Result<()> {
        let mut regimens = self.store.load()?;
        if regimens.shift_remove(name).is_none() {
            return Err(RegimenError::NotFound(name.to_string()));
        }
        self.store.save(&regimens)?;
        tracing::info!(regimen = name, "regimen deleted");
        out.say(format!("Deleted regimen '{name}'"));
        Ok(())
    }

    pub fn list_regimens(&self, out: &mut Outbox) {
        let regimens = self.load_or_report(out);
        if regimens.is_empty() {
            out.say("No regimens available");
            return;
        }
        out.say("Available regimens:");
        for (name, steps) in &regimens {
            let timers = steps
                .iter()
                .map(|s| format!("{} ({}s)", s.name, s.duration))
                .collect::<Vec<_>>()
                .join(", ");
            out.say(format!("- {name}: {timers}"));
        }
    }

    // ── Running ──────────────────────────────────────────────────────

    /// Start `name` from its first step. A regimen that is already running is
    /// stopped first; its in-flight timer keeps going on its own.
    pub fn run_regimen(
        &mut self,
        name: &str,
        registry: &mut TimerRegistry,
        sched: &mut Scheduler,
        out: &mut Outbox,
    ) -> Result<()> {
        let mut regimens = self.load_or_report(out);
        let steps = regimens
            .shift_remove(name)
            .ok_or_else(|| RegimenError::NotFound(name.to_string()))?;
        if steps.is_empty() {
            return Err(RegimenError::Empty(name.to_string()));
        }

        self.stop_current_regimen(sched, out);

        tracing::info!(regimen = name, steps = steps.len(), "regimen started");
        out.publish(Event::RegimenStarted {
            name: name.to_string(),
            steps: steps.len(),
            at: Utc::now(),
        });
        self.active = Some(ActiveRegimen {
            name: name.to_string(),
            total: steps.len(),
            queue: steps.into(),
            advance_job: None,
        });
        self.start_next_timer(registry, sched, out);
        Ok(())
    }

    /// Abandon the running regimen, if any, and return its name.
    pub fn stop_current_regimen(&mut self, sched: &mut Scheduler, out: &mut Outbox) -> Option<String> {
        let active = self.active.take()?;
        if let Some(job) = active.advance_job {
            sched.cancel(job);
        }
        tracing::info!(regimen = %active.name, "regimen stopped");
        out.say(format!("Stopping regimen '{}'", active.name));
        out.publish(Event::RegimenStopped {
            name: active.name.clone(),
            remaining_steps: active.queue.len(),
            at: Utc::now(),
        });
        Some(active.name)
    }

    /// Event hook. Schedules the next step when one of the running
    /// regimen's timers completes.
    pub fn on_event(&mut self, event: &Event, sched: &mut Scheduler) {
        let Event::TimerCompleted { name: timer, .. } = event else {
            return;
        };
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let prefix = format!("{}_", active.name);
        if !timer.starts_with(&prefix) {
            return;
        }
        if let Some(job) = active.advance_job.take() {
            sched.cancel(job);
        }
        tracing::debug!(regimen = %active.name, timer = %timer, "step completed");
        active.advance_job = Some(sched.schedule_in(
            ADVANCE_DELAY,
            Job::AdvanceRegimen {
                regimen: active.name.clone(),
            },
        ));
    }

    /// Handle an `AdvanceRegimen` job.
    pub fn on_advance(
        &mut self,
        regimen: &str,
        job: JobId,
        registry: &mut TimerRegistry,
        sched: &mut Scheduler,
        out: &mut Outbox,
    ) {
        match self.active.as_mut() {
            Some(active) if active.name == regimen && active.advance_job == Some(job) => {
                active.advance_job = None;
            }
            _ => {
                tracing::debug!(regimen, "stale regimen advance dropped");
                return;
            }
        }
        self.start_next_timer(registry, sched, out);
    }

    fn start_next_timer(
        &mut self,
        registry: &mut TimerRegistry,
        sched: &mut Scheduler,
        out: &mut Outbox,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(step) = active.queue.pop_front() else {
            let name = active.name.clone();
            self.active = None;
            tracing::info!(regimen = %name, "regimen completed");
            out.say(format!("Regimen '{name}' completed!"));
            out.publish(Event::RegimenCompleted {
                name,
                at: Utc::now(),
            });
            return;
        };

        let timer = format!("{}_{}", active.name, step.name);
        out.say(format!(
            "Starting regimen timer: {timer} ({}s)",
            step.duration
        ));
        out.publish(Event::RegimenStepStarted {
            regimen: active.name.clone(),
            timer: timer.clone(),
            duration_secs: step.duration,
            at: Utc::now(),
        });
        if let Err(e) = registry.create(&timer, step.duration, sched, out) {
            tracing::warn!(regimen = %active.name, timer = %timer, error = %e, "regimen step failed");
            out.say(format!("Error: {e}"));
            self.stop_current_regimen(sched, out);
        }
    }

    fn load_or_report(&self, out: &mut Outbox) -> Regimens {
        match self.store.load() {
            Ok(regimens) => regimens,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load regimens");
                out.say(format!("Error loading regimens: {e}"));
                Regimens::new()
            }
        }
    }
}
