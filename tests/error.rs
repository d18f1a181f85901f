//! Tests for error module

use routenovelty::NoveltyError;

#[test]
fn test_error_display() {
    let err = NoveltyError::InsufficientPoints {
        point_count: 0,
        minimum_required: 1,
    };
    assert!(err.to_string().contains("0 points"));

    let err = NoveltyError::InvalidPoint {
        index: 7,
        latitude: 91.0,
        longitude: 0.0,
    };
    assert!(err.to_string().contains("index 7"));
    assert!(err.to_string().contains("lat=91"));

    let err = NoveltyError::IdExhausted { last: u32::MAX };
    assert!(err.to_string().contains("4294967295"));
}

#[test]
fn test_error_from_io() {
    let err: NoveltyError = std::io::Error::other("boom").into();
    assert!(matches!(err, NoveltyError::Io(_)));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn test_error_from_json() {
    let json_err = serde_json::from_str::<Vec<u32>>("[").unwrap_err();
    let err: NoveltyError = json_err.into();
    assert!(matches!(err, NoveltyError::Serialization(_)));
}
