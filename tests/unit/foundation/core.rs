use super::*;

#[test]
fn zoom_and_scale_are_inverse() {
    for z in [-2.0, 0.0, 3.5, 8.0, 14.0] {
        let s = zoom_to_scale(z);
        assert!((scale_to_zoom(s) - z).abs() < 1e-12);
    }
    assert!((zoom_to_scale(0.0) - SCALE_FACTOR).abs() < 1e-12);
}

#[test]
fn coordinate_serializes_as_pair() {
    let c = Coordinate::new(9.5, -48.25);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "[9.5,-48.25]");
    let back: Coordinate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn coordinate_drops_altitude_and_rejects_short_arrays() {
    let c: Coordinate = serde_json::from_str("[1.0, 2.0, 350.0]").unwrap();
    assert_eq!(c, Coordinate::new(1.0, 2.0));
    assert!(serde_json::from_str::<Coordinate>("[1.0]").is_err());
}

#[test]
fn validate_rejects_non_finite_and_out_of_range() {
    assert!(Coordinate::new(0.0, 0.0).validate().is_ok());
    assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
    assert!(Coordinate::new(0.0, 91.0).validate().is_err());
}

#[test]
fn sha256_hex_hashes_the_concatenation() {
    let empty = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    assert_eq!(sha256_hex(&[]), empty);
    assert_eq!(
        sha256_hex(&["ab".as_bytes(), "c".as_bytes()]),
        sha256_hex(&["abc".as_bytes()])
    );
    assert_eq!(sha256_hex(&["abc".as_bytes()]).len(), 64);
}
