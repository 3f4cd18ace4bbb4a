//! Regimen persistence.
//!
//! Regimens live in `<data_dir>/regimens.json` as a JSON object mapping each
//! regimen name to its steps, in the order they were created:
//!
//! ```json
//! {
//!   "workout": [
//!     { "name": "jog", "duration": 60 },
//!     { "name": "rest", "duration": 30 }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RegimenError;
use crate::storage::data_dir;

/// One timer in a regimen. `duration` is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimenStep {
    pub name: String,
    pub duration: u64,
}

impl RegimenStep {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Every stored regimen, keyed by name in insertion order.
pub type Regimens = IndexMap<String, Vec<RegimenStep>>;

/// Where regimens are kept.
pub trait RegimenStore {
    fn load(&self) -> Result<Regimens, RegimenError>;

    fn save(&mut self, regimens: &Regimens) -> Result<(), RegimenError>;
}

/// File-backed store. A missing file reads as no regimens.
#[derive(Debug, Clone)]
pub struct JsonRegimenStore {
    path: PathBuf,
}

impl JsonRegimenStore {
    pub const FILE_NAME: &'static str = "regimens.json";

    /// Store at `<data_dir>/regimens.json`.
    pub fn open() -> Result<Self, RegimenError> {
        let dir = data_dir().map_err(|e| RegimenError::DataDir(e.to_string()))?;
        Ok(Self::with_path(dir.join(Self::FILE_NAME)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegimenStore for JsonRegimenStore {
    fn load(&self) -> Result<Regimens, RegimenError> {
        if !self.path.exists() {
            return Ok(Regimens::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Regimens::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self, regimens: &Regimens) -> Result<(), RegimenError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(regimens)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), count = regimens.len(), "regimens saved");
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegimenStore {
    regimens: Regimens,
}

impl MemoryRegimenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, steps: &[(&str, u64)]) -> Self {
        self.regimens.insert(
            name.to_string(),
            steps
                .iter()
                .map(|&(step, secs)| RegimenStep::new(step, secs))
                .collect(),
        );
        self
    }
}

impl RegimenStore for MemoryRegimenStore {
    fn load(&self) -> Result<Regimens, RegimenError> {
        Ok(self.regimens.clone())
    }

    fn save(&mut self, regimens: &Regimens) -> Result<(), RegimenError> {
        self.regimens = regimens.clone();
        Ok(())
    }
}
