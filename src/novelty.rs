//! Novelty scoring and trend projection.
//!
//! Novelty is the complement of the single highest similarity between a
//! candidate route and any previously recorded run. A run with nothing
//! before it is maximally novel (1.0).
//!
//! The trend is a read-only projection over the run history: the novelty
//! values in insertion order, a trailing average for charts, and a flag
//! raised when the last `window` runs were all below a threshold.

use chrono::{DateTime, Utc};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::similarity::{DEFAULT_PRECISION, dtw_similarity, jaccard, quantize_route};
use crate::{GpsPoint, NoveltyError, Result};

/// A recorded run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRun {
    /// 1-based sequence number
    pub id: u32,
    /// Display name, "Run {id}"
    pub name: String,
    /// Route points in time order
    pub points: Vec<GpsPoint>,
    #[serde(alias = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    /// Novelty against all runs recorded before this one, in [0, 1]
    #[serde(alias = "novelty")]
    pub novelty_score: f64,
    /// Highest grid overlap with any earlier run
    #[serde(default)]
    pub overlap_similarity: f64,
    /// Highest DTW similarity with any earlier run
    #[serde(default)]
    pub dtw_similarity: f64,
}

/// Which similarity drives the novelty score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SimilarityMetric {
    /// Jaccard overlap on the quantized grid only
    #[default]
    Overlap,
    /// The larger of overlap and DTW similarity
    Combined,
}

/// Configuration for novelty scoring and trend detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoveltyConfig {
    /// Quantization precision in decimal digits.
    /// Default: 3 (~111m cells)
    pub precision: u32,

    /// Similarity used for the novelty score.
    /// Default: overlap
    pub metric: SimilarityMetric,

    /// Number of most recent runs inspected for prolonged low novelty,
    /// also the width of the trailing average.
    /// Default: 5
    pub trend_window: usize,

    /// Novelty strictly below this counts as low.
    /// Default: 0.2
    pub low_threshold: f64,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            metric: SimilarityMetric::Overlap,
            trend_window: 5,
            low_threshold: 0.2,
        }
    }
}

impl NoveltyConfig {
    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.trend_window == 0 {
            return Err(NoveltyError::InvalidConfig(
                "trend_window must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.low_threshold) {
            return Err(NoveltyError::InvalidConfig(format!(
                "low_threshold must be within [0, 1], got {}",
                self.low_threshold
            )));
        }
        Ok(())
    }
}

/// Novelty of a candidate route plus the similarities behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyScore {
    /// 1 - highest similarity under the configured metric
    pub novelty: f64,
    /// Highest grid overlap with any prior run (0 with no history)
    pub overlap: f64,
    /// Highest DTW similarity with any prior run (0 with no history)
    pub dtw: f64,
}

/// Score a candidate route against the run history.
///
/// With an empty history the candidate is maximally novel.
pub fn compute_route_novelty(
    candidate: &[GpsPoint],
    history: &[RouteRun],
    config: &NoveltyConfig,
) -> NoveltyScore {
    if history.is_empty() {
        return NoveltyScore {
            novelty: 1.0,
            overlap: 0.0,
            dtw: 0.0,
        };
    }

    let candidate_cells = quantize_route(candidate, config.precision);
    let score_run = |run: &RouteRun| -> (f64, f64) {
        let overlap = jaccard(&candidate_cells, &quantize_route(&run.points, config.precision));
        (overlap, dtw_similarity(candidate, &run.points))
    };

    #[cfg(feature = "parallel")]
    let (overlap, dtw) = history
        .par_iter()
        .map(score_run)
        .reduce(|| (0.0, 0.0), |a, b| (a.0.max(b.0), a.1.max(b.1)));

    #[cfg(not(feature = "parallel"))]
    let (overlap, dtw) = history
        .iter()
        .map(score_run)
        .fold((0.0f64, 0.0f64), |a, b| (a.0.max(b.0), a.1.max(b.1)));

    let best = match config.metric {
        SimilarityMetric::Overlap => overlap,
        SimilarityMetric::Combined => overlap.max(dtw),
    };

    NoveltyScore {
        novelty: (1.0 - best).clamp(0.0, 1.0),
        overlap,
        dtw,
    }
}

/// Summary of novelty over the history. Recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoveltyTrend {
    /// Novelty scores, oldest first
    pub values: Vec<f64>,
    /// Trailing average of `values` over the trend window
    pub rolling: Vec<f64>,
    /// The last `window` runs were all below the threshold
    pub prolonged_low: bool,
}

/// Novelty scores in insertion order.
pub fn novelty_values(history: &[RouteRun]) -> impl Iterator<Item = f64> + '_ {
    history.iter().map(|run| run.novelty_score)
}

/// Trailing moving average. Early entries average over the shorter prefix.
///
/// A window of 0 is treated as 1.
pub fn rolling_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            // Sum each window afresh so a run of zeros averages to exactly 0
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Project the history into a novelty trend.
///
/// `prolonged_low` needs at least `window` runs; with fewer there is not
/// enough evidence and it is false. A zero window never flags.
///
/// # Example
/// ```
/// use routenovelty::compute_novelty_trend;
///
/// let trend = compute_novelty_trend(&[], 5, 0.2);
/// assert!(trend.values.is_empty());
/// assert!(!trend.prolonged_low);
/// ```
pub fn compute_novelty_trend(history: &[RouteRun], window: usize, threshold: f64) -> NoveltyTrend {
    let values: Vec<f64> = novelty_values(history).collect();
    let prolonged_low = window > 0
        && values.len() >= window
        && values[values.len() - window..].iter().all(|&v| v < threshold);
    let rolling = rolling_average(&values, window);

    NoveltyTrend {
        values,
        rolling,
        prolonged_low,
    }
}
