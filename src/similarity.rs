//! Route similarity on a quantized coordinate grid.
//!
//! Two routes are compared as *sets* of grid cells: every point is rounded
//! to `precision` decimal digits on both axes, duplicates collapse, and the
//! Jaccard index of the two sets is the similarity. Point order is ignored,
//! so a route run in reverse scores the same as the original.
//!
//! Precision 3 gives cells of roughly 111m at the equator. Longitude cells
//! shrink towards the poles; that skew is accepted, not corrected.
//!
//! A secondary, order-aware metric based on dynamic time warping (DTW) is
//! also provided for callers that want a softer notion of "close".

use std::collections::HashSet;

use crate::GpsPoint;
use crate::geo_utils::angular_distance_degrees;

/// Default quantization precision in decimal digits (~111m cells).
pub const DEFAULT_PRECISION: u32 = 3;

/// Highest precision honoured. An f64 degree value cannot carry more
/// significant fractional digits, and larger scales overflow the grid key.
pub const MAX_PRECISION: u32 = 15;

/// A point snapped to the quantization grid.
///
/// Holds `round(coord * 10^precision)` for each axis, so two points are the
/// same location iff their keys are equal. Keys from different precisions
/// are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedPoint {
    pub lat_idx: i64,
    pub lng_idx: i64,
}

fn grid_scale(precision: u32) -> f64 {
    10f64.powi(precision.min(MAX_PRECISION) as i32)
}

/// Snap a point to the grid at `precision` decimal digits.
pub fn quantize(point: &GpsPoint, precision: u32) -> QuantizedPoint {
    let scale = grid_scale(precision);
    QuantizedPoint {
        lat_idx: (point.latitude * scale).round() as i64,
        lng_idx: (point.longitude * scale).round() as i64,
    }
}

/// Quantize every point of a route into a set of grid keys.
pub fn quantize_route(route: &[GpsPoint], precision: u32) -> HashSet<QuantizedPoint> {
    route.iter().map(|p| quantize(p, precision)).collect()
}

/// Jaccard similarity of two routes on the quantized grid, in `[0, 1]`.
///
/// Returns 0 when both routes are empty: there is nothing to overlap.
///
/// # Example
/// ```
/// use routenovelty::{GpsPoint, similarity};
///
/// let a = vec![GpsPoint::new(44.000, -93.000), GpsPoint::new(44.001, -93.001)];
/// let b = vec![GpsPoint::new(44.0001, -93.0001), GpsPoint::new(44.002, -93.002)];
///
/// // One shared cell out of three distinct cells.
/// assert!((similarity(&a, &b, 3) - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn similarity(route_a: &[GpsPoint], route_b: &[GpsPoint], precision: u32) -> f64 {
    let set_a = quantize_route(route_a, precision);
    let set_b = quantize_route(route_b, precision);
    jaccard(&set_a, &set_b)
}

/// [`similarity`] at [`DEFAULT_PRECISION`].
pub fn similarity_default(route_a: &[GpsPoint], route_b: &[GpsPoint]) -> f64 {
    similarity(route_a, route_b, DEFAULT_PRECISION)
}

/// Jaccard index of two pre-quantized routes.
pub fn jaccard(set_a: &HashSet<QuantizedPoint>, set_b: &HashSet<QuantizedPoint>) -> f64 {
    // Iterate the smaller set
    let (small, large) = if set_a.len() <= set_b.len() {
        (set_a, set_b)
    } else {
        (set_b, set_a)
    };
    let intersection = small.iter().filter(|k| large.contains(k)).count();
    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Dynamic time warping distance between two routes.
///
/// Step cost is the great-circle angle between points in degrees; the
/// accumulated cost is normalised by `n + m`. Two empty routes are at
/// distance 0, an empty route is infinitely far from a non-empty one.
pub fn dtw_distance(route_a: &[GpsPoint], route_b: &[GpsPoint]) -> f64 {
    let n = route_a.len();
    let m = route_b.len();
    if n == 0 && m == 0 {
        return 0.0;
    }
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }

    // Two rolling rows of the (n+1) x (m+1) cost matrix
    let mut prev = vec![f64::INFINITY; m + 1];
    let mut curr = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for a in route_a {
        curr[0] = f64::INFINITY;
        for (j, b) in route_b.iter().enumerate() {
            let cost = angular_distance_degrees(a, b);
            let best = prev[j + 1].min(curr[j]).min(prev[j]);
            curr[j + 1] = cost + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m] / (n + m) as f64
}

/// DTW similarity `1 / (1 + dtw_distance)`, in `[0, 1]`.
pub fn dtw_similarity(route_a: &[GpsPoint], route_b: &[GpsPoint]) -> f64 {
    let distance = dtw_distance(route_a, route_b);
    if distance.is_infinite() {
        return 0.0;
    }
    1.0 / (1.0 + distance)
}

/// Both similarity metrics for a pair of routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    /// Jaccard overlap on the quantized grid
    pub overlap: f64,
    /// DTW similarity
    pub dtw: f64,
    /// The larger of the two
    pub max: f64,
}

/// Compute overlap and DTW similarity for a pair of routes.
pub fn compute_route_metrics(
    route_a: &[GpsPoint],
    route_b: &[GpsPoint],
    precision: u32,
) -> RouteMetrics {
    let overlap = similarity(route_a, route_b, precision);
    let dtw = dtw_similarity(route_a, route_b);
    RouteMetrics {
        overlap,
        dtw,
        max: overlap.max(dtw),
    }
}
