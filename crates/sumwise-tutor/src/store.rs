//! Persistent progress counters.
//!
//! The tutor tracks one durable number across program runs: how many
//! reward-game sessions the learner has completed, which selects the
//! earnings multiplier for the next session. The [`CounterStore`] trait
//! keeps the tutor independent of where that number lives; the file
//! store is used in production and the memory store in tests.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TutorError};

/// Key under which the completed reward-game session count is stored.
pub const COMPLETED_SESSIONS_KEY: &str = "completedGameSessions";

/// A named collection of persistent `u64` counters.
pub trait CounterStore: Send + Debug {
    /// Reads a counter, returning 0 when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or is
    /// corrupted.
    fn load(&self, key: &str) -> Result<u64>;

    /// Writes a counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn store(&mut self, key: &str, value: u64) -> Result<()>;

    /// Adds one to a counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or written.
    fn increment(&mut self, key: &str) -> Result<u64> {
        let next = self.load(key)?.saturating_add(1);
        self.store(key, next)?;
        Ok(next)
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Counters persisted as a flat JSON object on disk.
///
/// The file is read on every load and rewritten whole on every store, so
/// the on-disk state is always current even if the process exits without
/// a shutdown hook. A missing file reads as all-zero counters.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, u64>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents)
            .map_err(|e| TutorError::store_corrupted(&self.path, e.to_string()))
    }

    fn write_all(&self, counters: &HashMap<String, u64>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| TutorError::store_write(&self.path, e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(counters)?;
        std::fs::write(&self.path, json)
            .map_err(|e| TutorError::store_write(&self.path, e.to_string()))
    }
}

impl CounterStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<u64> {
        let counters = self.read_all()?;
        Ok(counters.get(key).copied().unwrap_or(0))
    }

    fn store(&mut self, key: &str, value: u64) -> Result<()> {
        let mut counters = self.read_all()?;
        counters.insert(key.to_string(), value);
        self.write_all(&counters)?;
        debug!(key, value, path = %self.path.display(), "Persisted counter");
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Volatile counters for tests and hosts that opt out of persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counters: HashMap<String, u64>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one counter pre-seeded.
    #[must_use]
    pub fn with_counter(key: &str, value: u64) -> Self {
        let mut store = Self::new();
        store.counters.insert(key.to_string(), value);
        store
    }
}

impl CounterStore for MemoryStore {
    fn load(&self, key: &str) -> Result<u64> {
        Ok(self.counters.get(key).copied().unwrap_or(0))
    }

    fn store(&mut self, key: &str, value: u64) -> Result<()> {
        self.counters.insert(key.to_string(), value);
        Ok(())
    }
}
