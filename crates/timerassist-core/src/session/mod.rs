//! The dispatch boundary between free text and the timer machinery.
//!
//! A [`Session`] owns one of everything: the scheduler, the timer registry,
//! the regimen sequencer, the interpreter and the injected alert service,
//! output sink and subscribers. Every input line and every fired job is
//! handled to completion, then its collected side effects are flushed in
//! order:
//!
//! 1. lines to the [`OutputSink`]
//! 2. alert requests to the [`AlertService`]
//! 3. events to the sequencer, then to each [`Subscribe`]r
//!
//! Errors from the registry or sequencer are reported as a single
//! `Error: ...` line and never escape [`Session::handle_input`].

mod subscriber;

use std::time::Duration;

pub use subscriber::{LogSubscriber, Subscribe};

use crate::alert::{AlertService, AlertSettings};
use crate::command::{Command, CommandInterpreter};
use crate::error::Result;
use crate::outbox::Outbox;
use crate::regimen::{RegimenSequencer, RegimenStep, RegimenStore};
use crate::timer::{Job, Scheduler, TimerRegistry};

const HELP: &str = "\
Welcome to Timer Assistant!
Just type what you want in plain English:

Timer examples:
- \"set a 5 minute timer for coffee break\"
- \"start a 25 min pomodoro timer\"
- \"create 1 hour meeting timer\"
- \"pause the coffee timer\"
- \"resume coffee\"
- \"show all timers\"
- \"delete meeting timer\"
- \"clear all timers\"

Regimen examples:
- \"run workout regimen\"
- \"start pomodoro routine\"
- \"show regimens\"

Type 'exit' to quit.";

const NOT_UNDERSTOOD: &str =
    "I didn't understand that command. Try rephrasing or type 'help'.";

/// Where user-facing lines go.
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

impl<F: FnMut(&str)> OutputSink for F {
    fn emit(&mut self, line: &str) {
        self(line)
    }
}

/// What the caller should do after an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub struct Session {
    sched: Scheduler,
    registry: TimerRegistry,
    sequencer: RegimenSequencer,
    interpreter: CommandInterpreter,
    alerts: Box<dyn AlertService>,
    sink: Box<dyn OutputSink>,
    subscribers: Vec<Box<dyn Subscribe>>,
    out: Outbox,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("now", &self.sched.now())
            .field("registry", &self.registry)
            .field("sequencer", &self.sequencer)
            .field(
                "subscribers",
                &self.subscribers.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(
        store: Box<dyn RegimenStore>,
        alerts: Box<dyn AlertService>,
        sink: Box<dyn OutputSink>,
    ) -> Self {
        Self {
            sched: Scheduler::new(),
            registry: TimerRegistry::new(),
            sequencer: RegimenSequencer::new(store),
            interpreter: CommandInterpreter::new(),
            alerts,
            sink,
            subscribers: Vec::new(),
            out: Outbox::new(),
        }
    }

    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Box<dyn Subscribe>) -> Self {
        self.subscribe(subscriber);
        self
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn Subscribe>) {
        tracing::debug!(subscriber = subscriber.name(), "subscriber registered");
        self.subscribers.push(subscriber);
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Virtual time since the session started.
    pub fn now(&self) -> Duration {
        self.sched.now()
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    pub fn sequencer(&self) -> &RegimenSequencer {
        &self.sequencer
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Handle one line of user input.
    pub fn handle_input(&mut self, text: &str) -> Control {
        let text = text.trim();
        if text.is_empty() {
            return Control::Continue;
        }
        match text.to_lowercase().as_str() {
            "exit" => return Control::Exit,
            "help" => {
                for line in HELP.lines() {
                    self.sink.emit(line);
                }
                return Control::Continue;
            }
            _ => {}
        }

        match self.interpreter.explain(text) {
            Some((rule, command)) => {
                tracing::debug!(rule, ?command, "input classified");
                self.execute(command);
                self.out.say(format!("Executed: {text}"));
            }
            None => {
                tracing::debug!(input = text, "input not understood");
                self.out.say(NOT_UNDERSTOOD);
            }
        }
        self.flush();
        Control::Continue
    }

    /// Run a command. Failures become an `Error: ...` line.
    pub fn execute(&mut self, command: Command) {
        if let Err(e) = self.dispatch(command) {
            tracing::debug!(error = %e, "command failed");
            self.out.say(format!("Error: {e}"));
        }
        self.flush();
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        let Self {
            sched,
            registry,
            sequencer,
            out,
            ..
        } = self;
        match command {
            Command::Create {
                name,
                duration_secs,
            } => registry.create(&name, duration_secs, sched, out)?,
            Command::Pause { name } => registry.pause(&name, out)?,
            Command::Resume { name } => registry.resume(&name, out)?,
            Command::Stop { name } => registry.stop(&name, sched, out)?,
            Command::Delete { name } => registry.delete(&name, sched, out)?,
            Command::List => registry.list(out),
            Command::ClearAll => registry.clear_all(sched, out),
            Command::RunRegimen { name } => sequencer.run_regimen(&name, registry, sched, out)?,
            Command::ListRegimens => sequencer.list_regimens(out),
        }
        Ok(())
    }

    // ── Regimen pass-throughs ────────────────────────────────────────

    pub fn create_regimen(&mut self, name: &str, steps: Vec<RegimenStep>) -> Result<()> {
        let result = self.sequencer.create_regimen(name, steps, &mut self.out);
        self.flush();
        result.map_err(Into::into)
    }

    pub fn delete_regimen(&mut self, name: &str) -> Result<()> {
        let result = self.sequencer.delete_regimen(name, &mut self.out);
        self.flush();
        result.map_err(Into::into)
    }

    pub fn stop_current_regimen(&mut self) -> Option<String> {
        let stopped = self
            .sequencer
            .stop_current_regimen(&mut self.sched, &mut self.out);
        self.flush();
        stopped
    }

    /// Stop every alert and every timer. Used on shutdown.
    pub fn stop_all(&mut self) {
        self.registry.stop_all(&mut self.sched, &mut self.out);
        self.flush();
    }

    /// Hand new beep settings to the alert service.
    pub fn apply_alert_settings(&mut self, settings: &AlertSettings) {
        self.alerts.apply_settings(settings);
    }

    /// Virtual time of the alert service's next pending beep or timeout.
    pub fn next_alert_due(&self) -> Option<Duration> {
        self.alerts.next_due()
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Fire every job due at or before `now`, in order.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some((id, job)) = self.sched.pop_due(now) {
            let at = self.sched.now();
            self.alerts.poll(at);
            tracing::debug!(?id, ?job, ?at, "job fired");
            match job {
                Job::Tick { timer } => {
                    self.registry
                        .on_tick(&timer, id, &mut self.sched, &mut self.out)
                }
                Job::CompletionWatch { timer } => self.registry.on_completion_watch(
                    &timer,
                    id,
                    &mut self.sched,
                    &mut self.out,
                ),
                Job::AdvanceRegimen { regimen } => self.sequencer.on_advance(
                    &regimen,
                    id,
                    &mut self.registry,
                    &mut self.sched,
                    &mut self.out,
                ),
            }
            self.flush();
        }
        self.sched.set_now(now);
        self.alerts.poll(self.sched.now());
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.sched.now() + delta);
    }

    fn flush(&mut self) {
        let (lines, alerts, events) = self.out.take().into_parts();
        for line in &lines {
            self.sink.emit(line);
        }
        for request in &alerts {
            self.alerts.apply(request);
        }
        for event in &events {
            self.sequencer.on_event(event, &mut self.sched);
            for subscriber in &mut self.subscribers {
                subscriber.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertRequest;
    use crate::events::Event;
    use crate::regimen::MemoryRegimenStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        lines: Vec<String>,
        alerts: Vec<AlertRequest>,
        events: Vec<Event>,
    }

    type Shared = Rc<RefCell<Recorded>>;

    struct RecordingAlerts(Shared);

    impl AlertService for RecordingAlerts {
        fn start_alert(&mut self, name: &str) {
            self.0.borrow_mut().alerts.push(AlertRequest::Start(name.into()));
        }

        fn stop_alert(&mut self, name: &str) {
            self.0.borrow_mut().alerts.push(AlertRequest::Stop(name.into()));
        }

        fn stop_all_alerts(&mut self) {
            self.0.borrow_mut().alerts.push(AlertRequest::StopAll);
        }
    }

    struct RecordingSubscriber(Shared);

    impl Subscribe for RecordingSubscriber {
        fn on_event(&mut self, event: &Event) {
            self.0.borrow_mut().events.push(event.clone());
        }
    }

    fn session(store: MemoryRegimenStore) -> (Session, Shared) {
        let rec: Shared = Rc::default();
        let sink = {
            let rec = rec.clone();
            move |line: &str| rec.borrow_mut().lines.push(line.to_string())
        };
        let session = Session::new(
            Box::new(store),
            Box::new(RecordingAlerts(rec.clone())),
            Box::new(sink),
        )
        .with_subscriber(Box::new(RecordingSubscriber(rec.clone())));
        (session, rec)
    }

    fn take_lines(rec: &Shared) -> Vec<String> {
        std::mem::take(&mut rec.borrow_mut().lines)
    }

    #[test]
    fn create_reports_then_echoes() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        assert_eq!(
            s.handle_input("set a 5 minute timer for coffee"),
            Control::Continue
        );
        assert_eq!(
            take_lines(&rec),
            [
                "Created timer 'coffee' (5m)",
                "[coffee]: 5m",
                "Executed: set a 5 minute timer for coffee",
            ]
        );
        assert!(s.registry().get("coffee").unwrap().is_running());
    }

    #[test]
    fn blank_help_exit_and_gibberish() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        assert_eq!(s.handle_input("   "), Control::Continue);
        assert!(take_lines(&rec).is_empty());

        s.handle_input("help");
        assert_eq!(take_lines(&rec)[0], "Welcome to Timer Assistant!");

        s.handle_input("hello there");
        assert_eq!(take_lines(&rec), [NOT_UNDERSTOOD]);

        assert_eq!(s.handle_input("exit"), Control::Exit);
    }

    #[test]
    fn errors_become_a_single_line() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        s.handle_input("pause missing");
        assert_eq!(
            take_lines(&rec),
            ["Error: Timer 'missing' does not exist", "Executed: pause missing"]
        );

        s.execute(Command::Create {
            name: "x".into(),
            duration_secs: 5,
        });
        take_lines(&rec);
        s.execute(Command::Create {
            name: "x".into(),
            duration_secs: 5,
        });
        assert_eq!(take_lines(&rec), ["Error: Timer 'x' already exists"]);
    }

    #[test]
    fn completion_flows_to_alerts_and_subscribers() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        s.handle_input("3 second tea timer");
        s.advance_by(Duration::from_secs(4));

        let rec = rec.borrow();
        assert!(rec.lines.contains(&"[tea]: Complete!".to_string()));
        assert_eq!(rec.alerts, [AlertRequest::Start("tea".into())]);
        assert!(rec
            .events
            .iter()
            .any(|e| matches!(e, Event::TimerCompleted { name, .. } if name == "tea")));
    }

    #[test]
    fn regimen_runs_to_completion() {
        let store = MemoryRegimenStore::new().with("workout", &[("jog", 60), ("rest", 30)]);
        let (mut s, rec) = session(store);
        s.handle_input("run workout regimen");
        assert!(take_lines(&rec).contains(&"Starting regimen timer: workout_jog (60s)".to_string()));

        // jog completes at 61s, rest starts at 62s.
        s.advance_to(Duration::from_secs(61));
        assert!(!s.registry().contains("workout_rest"));
        s.advance_to(Duration::from_secs(62));
        assert!(take_lines(&rec).contains(&"Starting regimen timer: workout_rest (30s)".to_string()));

        // rest completes at 93s, the regimen ends at 94s.
        s.advance_to(Duration::from_secs(94));
        assert!(take_lines(&rec).contains(&"Regimen 'workout' completed!".to_string()));
        assert_eq!(s.sequencer().current(), None);
    }

    #[test]
    fn unknown_regimen_is_reported() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        s.handle_input("run legs regimen");
        assert_eq!(
            take_lines(&rec),
            ["Error: Regimen 'legs' not found", "Executed: run legs regimen"]
        );
    }

    #[test]
    fn regimen_pass_throughs() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        s.create_regimen("legs", vec![RegimenStep::new("squat", 30)])
            .unwrap();
        assert_eq!(take_lines(&rec), ["Created regimen 'legs' with 1 timer(s)"]);

        s.handle_input("run legs regimen");
        take_lines(&rec);
        assert_eq!(s.stop_current_regimen().as_deref(), Some("legs"));
        assert_eq!(take_lines(&rec), ["Stopping regimen 'legs'"]);

        s.delete_regimen("legs").unwrap();
        assert!(s.delete_regimen("legs").is_err());
    }

    #[test]
    fn clear_all_stops_alerts() {
        let (mut s, rec) = session(MemoryRegimenStore::new());
        s.handle_input("10 second tea timer");
        s.handle_input("clear all");
        let rec = rec.borrow();
        assert!(rec.lines.contains(&"Cleared 1 timer(s): tea".to_string()));
        assert_eq!(rec.alerts, [AlertRequest::StopAll]);
        assert!(s.registry().is_empty());
    }
}
