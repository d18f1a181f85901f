//! Property tests for similarity invariants

use proptest::prelude::*;
use routenovelty::{GpsPoint, dtw_similarity, similarity};

fn point() -> impl Strategy<Value = GpsPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GpsPoint::new(lat, lon))
}

/// Points clustered in a small area so routes actually share cells.
fn local_point() -> impl Strategy<Value = GpsPoint> {
    (44.0f64..44.01, -93.01f64..-93.0).prop_map(|(lat, lon)| GpsPoint::new(lat, lon))
}

fn route() -> impl Strategy<Value = Vec<GpsPoint>> {
    prop_oneof![
        prop::collection::vec(point(), 0..30),
        prop::collection::vec(local_point(), 0..30),
    ]
}

proptest! {
    #[test]
    fn similarity_with_self_is_one(r in prop::collection::vec(local_point(), 1..30), p in 0u32..=8) {
        prop_assert_eq!(similarity(&r, &r, p), 1.0);
    }

    #[test]
    fn similarity_is_symmetric(a in route(), b in route(), p in 0u32..=8) {
        prop_assert_eq!(similarity(&a, &b, p), similarity(&b, &a, p));
    }

    #[test]
    fn similarity_is_bounded(a in route(), b in route(), p in 0u32..=8) {
        let s = similarity(&a, &b, p);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn similarity_ignores_order(a in route(), b in route(), p in 0u32..=8) {
        let reversed: Vec<GpsPoint> = a.iter().rev().copied().collect();
        prop_assert_eq!(similarity(&a, &b, p), similarity(&reversed, &b, p));
    }

    #[test]
    fn empty_similarity_is_zero(p in 0u32..=20) {
        prop_assert_eq!(similarity(&[], &[], p), 0.0);
    }

    #[test]
    fn dtw_similarity_is_bounded(
        a in prop::collection::vec(local_point(), 0..15),
        b in prop::collection::vec(local_point(), 0..15),
    ) {
        let s = dtw_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }
}
