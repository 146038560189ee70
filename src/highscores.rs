//! Best score persistence
//!
//! A single key-value slot holding the highest score ever seen. The session
//! reads it once when a run ends and writes it only when the run beat it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Failure to read or write the best-score slot
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "high score storage i/o: {err}"),
            Self::Encode(err) => write!(f, "high score encoding: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

/// The persisted record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub best: u64,
}

/// Persistence collaborator for the best score
pub trait HighScoreStore {
    /// Read the stored best score (0 when absent or unreadable)
    fn load_best(&self) -> u64;

    /// Overwrite the stored best score
    fn save_best(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Compare a finished run against the store and persist it if it is higher.
///
/// Returns true only when the run beat the stored best and the new value was
/// written. Write failures leave the old value in place and are only logged.
pub fn record_if_best(store: &mut dyn HighScoreStore, score: u64) -> bool {
    let previous = store.load_best();
    if score <= previous {
        return false;
    }
    match store.save_best(score) {
        Ok(()) => {
            log::info!("New best score {} (was {})", score, previous);
            true
        }
        Err(err) => {
            log::warn!("Could not persist best score {}: {}", score, err);
            false
        }
    }
}

/// In-memory slot for tests and hosts that persist elsewhere
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously persisted value
    pub fn with_best(best: u64) -> Self {
        Self { best: Some(best) }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_best(&self) -> u64 {
        self.best.unwrap_or(0)
    }

    fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
        self.best = Some(score);
        Ok(())
    }
}

/// JSON file slot (`{"best": n}`) for native builds
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BestScore, StoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_best(&self) -> u64 {
        match self.read() {
            Ok(record) => record.best,
            Err(StoreError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => 0,
            Err(err) => {
                log::warn!("Ignoring unreadable best score at {}: {}", self.path.display(), err);
                0
            }
        }
    }

    fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&BestScore { best: score })?;
        // Write-then-rename so a crash never leaves a truncated slot
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
