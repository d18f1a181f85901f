//! SQLite history storage.
//!
//! One row per run. Points are stored as JSON text; the run list is small
//! enough that `save` rewrites the table inside a single transaction.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, params};

use crate::{Result, RouteRun};

use super::RunStorage;

/// History stored in a `route_runs` table.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) a database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS route_runs (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                points TEXT NOT NULL,           -- JSON array of {lat, lon}
                recorded_at TEXT NOT NULL,      -- UTC, ISO 8601
                novelty_score REAL NOT NULL,
                overlap_similarity REAL NOT NULL DEFAULT 0,
                dtw_similarity REAL NOT NULL DEFAULT 0
            );
            "#,
        )?;
        Ok(())
    }
}

impl RunStorage for SqliteStorage {
    fn load(&self) -> Result<Vec<RouteRun>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT id, name, points, recorded_at, novelty_score,
                    overlap_similarity, dtw_similarity
             FROM route_runs ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, DateTime<Utc>>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, f64>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut runs = Vec::with_capacity(rows.len());
        for (id, name, points_json, recorded_at, novelty_score, overlap, dtw) in rows {
            runs.push(RouteRun {
                id,
                name,
                points: serde_json::from_str(&points_json)?,
                recorded_at,
                novelty_score,
                overlap_similarity: overlap,
                dtw_similarity: dtw,
            });
        }
        debug!("Loaded {} runs from SQLite", runs.len());
        Ok(runs)
    }

    fn save(&self, runs: &[RouteRun]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM route_runs", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO route_runs
                    (id, name, points, recorded_at, novelty_score, overlap_similarity, dtw_similarity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for run in runs {
                stmt.execute(params![
                    run.id,
                    run.name,
                    serde_json::to_string(&run.points)?,
                    run.recorded_at,
                    run.novelty_score,
                    run.overlap_similarity,
                    run.dtw_similarity,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Saved {} runs to SQLite", runs.len());
        Ok(())
    }
}
