//! # Route Novelty
//!
//! Route similarity and novelty tracking for GPS run histories.
//!
//! This library provides:
//! - Jaccard overlap between routes on a quantized coordinate grid
//! - Dynamic time warping (DTW) similarity as a secondary metric
//! - Per-run novelty scoring against everything recorded before
//! - Novelty trend projection with a prolonged-low (repetition) flag
//! - Pluggable history storage (memory, JSON file, SQLite)
//!
//! ## Features
//!
//! - **`parallel`** - Score candidates against history in parallel with rayon
//! - **`persistence`** - Enable SQLite history storage
//! - **`cli`** - Build the `routenovelty-cli` debug tool (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use routenovelty::{GpsPoint, MemoryStorage, NoveltyTracker, similarity};
//!
//! let loop_a = vec![GpsPoint::new(44.000, -93.000), GpsPoint::new(44.001, -93.001)];
//! let loop_b = vec![GpsPoint::new(44.0001, -93.0001), GpsPoint::new(44.002, -93.002)];
//!
//! let score = similarity(&loop_a, &loop_b, 3);
//! assert!((score - 1.0 / 3.0).abs() < 1e-9);
//!
//! let mut tracker = NoveltyTracker::new(MemoryStorage::new()).unwrap();
//! let first = tracker.record_run(&loop_a).unwrap();
//! assert_eq!(first.novelty_score, 1.0);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{NoveltyError, Result};

// Geographic utilities (distance, bounds)
pub mod geo_utils;

// Similarity engine (quantized Jaccard overlap + DTW)
pub mod similarity;
pub use similarity::{
    DEFAULT_PRECISION, MAX_PRECISION, QuantizedPoint, RouteMetrics, compute_route_metrics,
    dtw_distance, dtw_similarity, quantize, quantize_route, similarity, similarity_default,
};

// Novelty scoring and trend projection
pub mod novelty;
pub use novelty::{
    NoveltyConfig, NoveltyScore, NoveltyTrend, RouteRun, SimilarityMetric,
    compute_novelty_trend, compute_route_novelty, novelty_values, rolling_average,
};

// History owner
pub mod tracker;
pub use tracker::NoveltyTracker;

// Storage collaborators
pub mod storage;
pub use storage::{JsonFileStorage, MemoryStorage, RunStorage};
#[cfg(feature = "persistence")]
pub use storage::SqliteStorage;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate in decimal degrees.
///
/// Serialized as `{"lat": .., "lon": ..}`.
///
/// # Example
/// ```
/// use routenovelty::GpsPoint;
/// let point = GpsPoint::new(44.9778, -93.2650); // Minneapolis
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lon", alias = "longitude", alias = "lng")]
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}
