//! Cooperative job scheduler.
//!
//! The scheduler is a virtual clock plus an ordered queue of pending [`Job`]s.
//! It never sleeps and owns no threads: the caller advances time (the realtime
//! [`driver`](crate::driver) does so once per wall-clock second, tests do it
//! directly) and the [`Session`](crate::Session) pops due jobs one at a time.
//!
//! Jobs due at the same instant come out in the order they were scheduled.
//! Cancelling removes the job from the queue immediately.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`Scheduler::schedule_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

/// Deferred work. Jobs carry names, never references, and are re-validated
/// against current state when they fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// One countdown step for a timer.
    Tick { timer: String },
    /// Check whether a timer reached zero and should start alerting.
    CompletionWatch { timer: String },
    /// Start the next step of a regimen.
    AdvanceRegimen { regimen: String },
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, JobId), Job>,
    due_at: HashMap<JobId, Duration>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_in(&mut self, delay: Duration, job: Job) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        tracing::trace!(?id, ?due, ?job, "job scheduled");
        self.queue.insert((due, id), job);
        self.due_at.insert(id, due);
        id
    }

    /// Remove a pending job. Returns `false` when it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: JobId) -> bool {
        match self.due_at.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: JobId) -> bool {
        self.due_at.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest job due at or before `until`, moving the clock to its
    /// due time. Returns `None` (and leaves the clock alone) when nothing is
    /// due.
    pub fn pop_due(&mut self, until: Duration) -> Option<(JobId, Job)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let job = self.queue.remove(&(due, id))?;
        self.due_at.remove(&id);
        self.now = self.now.max(due);
        Some((id, job))
    }

    /// Move the clock forward without firing anything. Time never runs
    /// backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}
