//! Geographic utilities.

use crate::{Bounds, GpsPoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine formula).
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlng = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
}

/// Central angle between two points, in degrees.
///
/// Same as [`haversine_distance`] but expressed on the unit sphere, so
/// costs stay on the scale of raw coordinate differences.
pub fn angular_distance_degrees(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    (haversine_distance(p1, p2) / EARTH_RADIUS_METERS).to_degrees()
}

/// Total length of a track in meters.
pub fn route_distance(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Bounds of a track. Returns zeroed bounds for an empty track.
pub fn compute_bounds(points: &[GpsPoint]) -> Bounds {
    Bounds::from_points(points).unwrap_or(Bounds {
        min_lat: 0.0,
        max_lat: 0.0,
        min_lng: 0.0,
        max_lng: 0.0,
    })
}
