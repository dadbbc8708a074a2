use super::*;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn distance_along_equator_and_meridian() {
    let d = great_circle_distance(Coordinate::new(0.0, 0.0), Coordinate::new(90.0, 0.0));
    assert!(close(d, std::f64::consts::FRAC_PI_2, 1e-9));

    let d = great_circle_distance(Coordinate::new(10.0, -45.0), Coordinate::new(10.0, 45.0));
    assert!(close(d, std::f64::consts::FRAC_PI_2, 1e-9));

    let d = great_circle_distance(Coordinate::new(3.0, 4.0), Coordinate::new(3.0, 4.0));
    assert!(close(d, 0.0, 1e-9));
}

#[test]
fn interpolate_hits_endpoints_and_midpoint() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(90.0, 0.0);
    assert_eq!(great_circle_interpolate(a, b, 0.0), a);
    assert_eq!(great_circle_interpolate(a, b, 1.0), b);

    let m = great_circle_interpolate(a, b, 0.5);
    assert!(close(m.lon, 45.0, 1e-9));
    assert!(close(m.lat, 0.0, 1e-9));
}

#[test]
fn interpolate_identical_points_is_stable() {
    let a = Coordinate::new(12.0, 55.0);
    let m = great_circle_interpolate(a, a, 0.3);
    assert_eq!(m, a);
}

#[test]
fn vec3_roundtrips_coordinates() {
    let c = Coordinate::new(-122.4, 37.8);
    let back = Vec3::from_coordinate(c).to_coordinate();
    assert!(close(back.lon, c.lon, 1e-9));
    assert!(close(back.lat, c.lat, 1e-9));
}

#[test]
fn normalize_degrees_wraps_into_half_open_range() {
    assert!(close(normalize_degrees(190.0), -170.0, 1e-9));
    assert!(close(normalize_degrees(-190.0), 170.0, 1e-9));
    assert!(close(normalize_degrees(180.0), 180.0, 1e-9));
    assert!(close(normalize_degrees(358.0), -2.0, 1e-9));
}
