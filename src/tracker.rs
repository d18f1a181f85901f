//! # Novelty Tracker
//!
//! Owns the run history. The history is loaded from a storage collaborator
//! once, at construction, and grows only through [`NoveltyTracker::record_run`].
//! Runs are never mutated or removed here.
//!
//! Recording takes `&mut self`, so calls on one tracker are serialized by
//! the borrow checker. Two trackers opened on the same storage do not see
//! each other's runs; the last `save` wins.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::novelty::{
    NoveltyConfig, NoveltyTrend, RouteRun, compute_novelty_trend, compute_route_novelty,
};
use crate::storage::RunStorage;
use crate::{GpsPoint, NoveltyError, Result};

/// Records runs, scores their novelty, and projects the novelty trend.
pub struct NoveltyTracker<S: RunStorage> {
    history: Vec<RouteRun>,
    storage: S,
    config: NoveltyConfig,
}

impl<S: RunStorage> NoveltyTracker<S> {
    /// Create a tracker with default configuration, loading history from `storage`.
    pub fn new(storage: S) -> Result<Self> {
        Self::with_config(storage, NoveltyConfig::default())
    }

    /// Create a tracker with custom configuration, loading history from `storage`.
    pub fn with_config(storage: S, config: NoveltyConfig) -> Result<Self> {
        config.validate()?;
        let history = storage.load()?;
        info!("Novelty tracker loaded {} runs", history.len());
        Ok(Self {
            history,
            storage,
            config,
        })
    }

    /// Record a new run stamped with the current time.
    pub fn record_run(&mut self, points: &[GpsPoint]) -> Result<RouteRun> {
        self.record_run_at(points, Utc::now())
    }

    /// Record a new run with an explicit timestamp.
    ///
    /// The route is validated first: it must be non-empty and every point
    /// must be a finite coordinate in range. Nothing is appended on error.
    ///
    /// Persistence is best effort. A failed save is logged and the run is
    /// still returned; the in-memory history already contains it.
    pub fn record_run_at(
        &mut self,
        points: &[GpsPoint],
        recorded_at: DateTime<Utc>,
    ) -> Result<RouteRun> {
        validate_route(points)?;

        let id = self.next_id()?;
        let score = compute_route_novelty(points, &self.history, &self.config);
        let run = RouteRun {
            id,
            name: format!("Run {}", id),
            points: points.to_vec(),
            recorded_at,
            novelty_score: score.novelty,
            overlap_similarity: score.overlap,
            dtw_similarity: score.dtw,
        };

        debug!(
            "Run {}: {} points, novelty {:.3} (overlap {:.3}, dtw {:.3}) against {} prior runs",
            id,
            points.len(),
            score.novelty,
            score.overlap,
            score.dtw,
            self.history.len()
        );

        self.history.push(run.clone());

        if let Err(e) = self.storage.save(&self.history) {
            warn!("Failed to persist run history after run {}: {}", id, e);
        }

        Ok(run)
    }

    /// Novelty trend over the current history.
    pub fn trend(&self) -> NoveltyTrend {
        compute_novelty_trend(
            &self.history,
            self.config.trend_window,
            self.config.low_threshold,
        )
    }

    /// All runs, oldest first.
    pub fn history(&self) -> &[RouteRun] {
        &self.history
    }

    /// The most recently recorded run.
    pub fn latest(&self) -> Option<&RouteRun> {
        self.history.last()
    }

    /// Number of recorded runs.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if no runs have been recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Current configuration.
    pub fn config(&self) -> &NoveltyConfig {
        &self.config
    }

    /// The storage collaborator.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn next_id(&self) -> Result<u32> {
        let last = self.history.iter().map(|r| r.id).max().unwrap_or(0);
        last.checked_add(1).ok_or(NoveltyError::IdExhausted { last })
    }
}

/// Reject routes that cannot be scored.
fn validate_route(points: &[GpsPoint]) -> Result<()> {
    if points.is_empty() {
        return Err(NoveltyError::InsufficientPoints {
            point_count: 0,
            minimum_required: 1,
        });
    }
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_valid()) {
        return Err(NoveltyError::InvalidPoint {
            index,
            latitude: p.latitude,
            longitude: p.longitude,
        });
    }
    Ok(())
}
