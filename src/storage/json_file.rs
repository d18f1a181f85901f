//! JSON file history storage.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::{Result, RouteRun};

use super::RunStorage;

/// History stored as a single JSON array of runs.
///
/// A missing file loads as an empty history. Saves write a sibling
/// `.tmp` file and rename it over the target, so readers never see a
/// half-written array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a store backed by `path`. The file is not touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RunStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<RouteRun>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let runs: Vec<RouteRun> = serde_json::from_reader(BufReader::new(file))?;
        debug!("Loaded {} runs from {}", runs.len(), self.path.display());
        Ok(runs)
    }

    fn save(&self, runs: &[RouteRun]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        let written =
            write_runs(&tmp, runs).and_then(|()| fs::rename(&tmp, &self.path).map_err(Into::into));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e);
        }
        debug!("Saved {} runs to {}", runs.len(), self.path.display());
        Ok(())
    }
}

fn write_runs(path: &Path, runs: &[RouteRun]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, runs)?;
    writer.flush()?;
    Ok(())
}
