//! In-memory history storage.

use std::sync::Mutex;

use crate::{Result, RouteRun};

use super::RunStorage;

/// History kept in a mutex-guarded vector.
///
/// Useful in tests: keep a reference to the storage while a tracker writes
/// through it, then inspect what was saved.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    runs: Mutex<Vec<RouteRun>>,
    save_count: Mutex<usize>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with runs.
    pub fn with_runs(runs: Vec<RouteRun>) -> Self {
        Self {
            runs: Mutex::new(runs),
            save_count: Mutex::new(0),
        }
    }

    /// Snapshot of the currently stored runs.
    pub fn snapshot(&self) -> Vec<RouteRun> {
        self.runs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RunStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<RouteRun>> {
        Ok(self.snapshot())
    }

    fn save(&self, runs: &[RouteRun]) -> Result<()> {
        *self.runs.lock().unwrap_or_else(|e| e.into_inner()) = runs.to_vec();
        *self.save_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
