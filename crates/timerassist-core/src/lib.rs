//! # timerassist-core
//!
//! Core library for a natural-language timer assistant. Free text such as
//! "set a 5 minute timer for coffee" is classified into a [`Command`] and run
//! against a registry of named countdown timers. Regimens chain timers back
//! to back; finished timers raise alerts until acknowledged.
//!
//! ## Architecture
//!
//! - **Command**: duration/name extraction and an ordered rule table that
//!   classifies text
//! - **Timer**: the [`TimerRegistry`] state machine and a deterministic
//!   [`Scheduler`] of deferred jobs on a virtual clock
//! - **Regimen**: stored timer sequences and the [`RegimenSequencer`] that
//!   runs them
//! - **Alert**: the [`AlertService`] contract and the beeping [`AlertManager`]
//! - **Session**: the dispatch boundary that owns one of each of the above
//! - **Storage**: TOML configuration and the data directory
//!
//! Nothing here sleeps or spawns threads. Time only moves when the caller
//! advances the [`Session`], which the [`driver`] does from wall-clock time.

pub mod alert;
pub mod command;
pub mod driver;
pub mod error;
pub mod events;
pub mod outbox;
pub mod regimen;
pub mod session;
pub mod storage;
pub mod timer;

pub use alert::{AlertManager, AlertRequest, AlertService, AlertSettings, Notifier, SilentNotifier};
pub use command::{extract_duration, extract_timer_name, Command, CommandInterpreter};
pub use error::{ConfigError, CoreError, RegimenError, Result, TimerError};
pub use events::Event;
pub use outbox::Outbox;
pub use regimen::{
    JsonRegimenStore, MemoryRegimenStore, RegimenSequencer, RegimenStatus, RegimenStep,
    RegimenStore, Regimens,
};
pub use session::{Control, LogSubscriber, OutputSink, Session, Subscribe};
pub use storage::{data_dir, Config};
pub use timer::{format_time, Scheduler, Timer, TimerRegistry, TimerState};
