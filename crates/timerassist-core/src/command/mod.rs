//! Free-text command interpretation.
//!
//! Raw text goes through the [`CommandInterpreter`], which consults the
//! duration/name extractors in [`extract`] and produces a [`Command`]. The
//! command is the only thing the session hands to the registry and sequencer.

pub mod extract;
mod interpreter;
mod keywords;

use serde::{Deserialize, Serialize};

pub use extract::{extract_duration, extract_duration_match, extract_timer_name, DurationMatch};
pub use interpreter::{CommandInterpreter, Rule};

/// A classified user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Create { name: String, duration_secs: u64 },
    Pause { name: String },
    Resume { name: String },
    Stop { name: String },
    Delete { name: String },
    List,
    ClearAll,
    RunRegimen { name: String },
    ListRegimens,
}

impl Command {
    /// Short lowercase label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Pause { .. } => "pause",
            Command::Resume { .. } => "resume",
            Command::Stop { .. } => "stop",
            Command::Delete { .. } => "delete",
            Command::List => "list",
            Command::ClearAll => "clear_all",
            Command::RunRegimen { .. } => "run_regimen",
            Command::ListRegimens => "list_regimens",
        }
    }
}
