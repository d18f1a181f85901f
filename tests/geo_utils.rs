//! Tests for geo_utils module

use routenovelty::geo_utils::*;
use routenovelty::{Bounds, GpsPoint};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_haversine_distance_same_point() {
    let p = GpsPoint::new(51.5074, -0.1278);
    assert_eq!(haversine_distance(&p, &p), 0.0);
}

#[test]
fn test_haversine_distance_known_value() {
    // London to Paris is approximately 344 km
    let london = GpsPoint::new(51.5074, -0.1278);
    let paris = GpsPoint::new(48.8566, 2.3522);
    let dist = haversine_distance(&london, &paris);
    assert!(approx_eq(dist, 343_560.0, 5000.0));
}

#[test]
fn test_haversine_antipodal_is_finite() {
    let a = GpsPoint::new(0.0, 0.0);
    let b = GpsPoint::new(0.0, 180.0);
    let dist = haversine_distance(&a, &b);
    assert!(dist.is_finite());
    assert!(approx_eq(dist, std::f64::consts::PI * EARTH_RADIUS_METERS, 1.0));
}

#[test]
fn test_angular_distance_along_equator() {
    let a = GpsPoint::new(0.0, 0.0);
    let b = GpsPoint::new(0.0, 2.0);
    assert!(approx_eq(angular_distance_degrees(&a, &b), 2.0, 1e-9));
}

#[test]
fn test_route_distance() {
    let track: Vec<GpsPoint> = (0..10)
        .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
        .collect();
    // 9 segments of ~111m
    assert!(approx_eq(route_distance(&track), 1000.0, 10.0));
    assert_eq!(route_distance(&[]), 0.0);
    assert_eq!(route_distance(&[GpsPoint::new(0.0, 0.0)]), 0.0);
}

#[test]
fn test_compute_bounds() {
    let track = vec![
        GpsPoint::new(51.50, -0.13),
        GpsPoint::new(51.51, -0.12),
        GpsPoint::new(51.505, -0.125),
    ];
    let bounds = compute_bounds(&track);
    assert_eq!(bounds.min_lat, 51.50);
    assert_eq!(bounds.max_lat, 51.51);
    assert_eq!(bounds.min_lng, -0.13);
    assert_eq!(bounds.max_lng, -0.12);
}

#[test]
fn test_compute_bounds_empty() {
    let bounds = compute_bounds(&[]);
    assert_eq!(bounds.min_lat, 0.0);
    assert_eq!(bounds.max_lng, 0.0);
    assert!(Bounds::from_points(&[]).is_none());
}

#[test]
fn test_bounds_center() {
    let bounds = Bounds::from_points(&[GpsPoint::new(51.50, -0.10), GpsPoint::new(51.52, -0.12)])
        .unwrap();
    let center = bounds.center();
    assert!(approx_eq(center.latitude, 51.51, 0.001));
    assert!(approx_eq(center.longitude, -0.11, 0.001));
}

#[test]
fn test_point_validity() {
    assert!(GpsPoint::new(44.0, -93.0).is_valid());
    assert!(GpsPoint::new(-90.0, 180.0).is_valid());
    assert!(!GpsPoint::new(90.1, 0.0).is_valid());
    assert!(!GpsPoint::new(0.0, -180.5).is_valid());
    assert!(!GpsPoint::new(f64::INFINITY, 0.0).is_valid());
}

#[test]
fn test_point_json_field_names() {
    let json = serde_json::to_string(&GpsPoint::new(44.5, -93.25)).unwrap();
    assert_eq!(json, r#"{"lat":44.5,"lon":-93.25}"#);

    let p: GpsPoint = serde_json::from_str(r#"{"latitude": 1.0, "lng": 2.0}"#).unwrap();
    assert_eq!(p, GpsPoint::new(1.0, 2.0));
}
