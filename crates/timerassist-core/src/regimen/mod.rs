//! Named, ordered sequences of timers that run back to back.

mod sequencer;
mod store;

pub use sequencer::{RegimenSequencer, RegimenStatus, ADVANCE_DELAY};
pub use store::{JsonRegimenStore, MemoryRegimenStore, RegimenStep, RegimenStore, Regimens};
