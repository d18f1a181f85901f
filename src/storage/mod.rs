//! # Run History Storage
//!
//! The tracker owns the history in memory; a storage collaborator only
//! loads it once at startup and receives the full list after each append.
//!
//! ## Backends
//!
//! - `MemoryStorage` - Mutex-guarded vector, for tests and embedding
//! - `JsonFileStorage` - JSON array on disk, same payload the tracker exports
//! - `SqliteStorage` - SQLite table (requires the `persistence` feature)

pub mod json_file;
pub mod memory;
#[cfg(feature = "persistence")]
pub mod sqlite;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "persistence")]
pub use sqlite::SqliteStorage;

use crate::{Result, RouteRun};

/// Load/save boundary for the run history.
///
/// `save` always receives the complete history, oldest first.
pub trait RunStorage {
    /// Load the persisted history, oldest first. An absent store is empty.
    fn load(&self) -> Result<Vec<RouteRun>>;

    /// Replace the persisted history.
    fn save(&self, runs: &[RouteRun]) -> Result<()>;
}

impl<S: RunStorage + ?Sized> RunStorage for Box<S> {
    fn load(&self) -> Result<Vec<RouteRun>> {
        (**self).load()
    }

    fn save(&self, runs: &[RouteRun]) -> Result<()> {
        (**self).save(runs)
    }
}

impl<S: RunStorage + ?Sized> RunStorage for &S {
    fn load(&self) -> Result<Vec<RouteRun>> {
        (**self).load()
    }

    fn save(&self, runs: &[RouteRun]) -> Result<()> {
        (**self).save(runs)
    }
}
