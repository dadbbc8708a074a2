use super::*;
use crate::foundation::math::normalize_degrees;

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

#[test]
fn foci_roundtrip_through_forward_and_inverse() {
    let proj = Projection::two_point_equidistant([c(2.35, 48.85), c(12.5, 41.9)])
        .with_scale_translate(800.0, Vec2::new(512.0, 512.0));
    for focus in proj.foci() {
        let p = proj.project(focus).unwrap();
        let back = proj.invert(p).unwrap();
        assert!((back.lon - focus.lon).abs() < 1e-6);
        assert!((back.lat - focus.lat).abs() < 1e-6);
    }
}

#[test]
fn westernmost_focus_comes_first() {
    let proj = Projection::two_point_equidistant([c(40.0, 10.0), c(-20.0, 5.0)]);
    assert_eq!(proj.foci(), [c(-20.0, 5.0), c(40.0, 10.0)]);
}

#[test]
fn close_foci_are_moved_towards_the_equator() {
    let north = Projection::two_point_equidistant([c(10.0, 10.0), c(10.0, 11.0)]);
    assert_eq!(north.foci()[1], c(10.0, 3.0));

    let same = Projection::two_point_equidistant([c(0.0, 0.0), c(0.0, 0.0)]);
    assert_eq!(same.foci()[1], c(0.0, 8.0));
    assert!(same.angle().is_finite());
}

#[test]
fn foci_on_the_equator_move_north() {
    let proj = Projection::two_point_equidistant([c(0.0, 0.0), c(7.5, 0.0)]);
    assert_eq!(proj.foci()[1], c(7.5, 8.0));
}

#[test]
fn chord_from_foci_midpoint_to_the_pole_points_up() {
    let proj = Projection::two_point_equidistant([c(-30.0, 20.0), c(40.0, 50.0)]);
    let [a, b] = proj.foci();
    let mid = great_circle_interpolate(a, b, 0.5);
    assert!(normalize_degrees(proj.azimuth_to_pole(mid)).abs() < 1e-6);

    let m = proj.project(mid).unwrap();
    let pole = proj.project(c(0.0, 90.0)).unwrap();
    assert!((pole.x - m.x).abs() < 1e-9 * (pole.y - m.y).abs().max(1.0));
    assert!(pole.y < m.y);
}

#[test]
fn local_north_is_only_roughly_up_away_from_the_equator() {
    let proj = Projection::two_point_equidistant([c(-30.0, 20.0), c(40.0, 50.0)]);
    let [a, b] = proj.foci();
    let mid = great_circle_interpolate(a, b, 0.5);
    assert!(normalize_degrees(proj.azimuth(mid)).abs() < 5.0);
}

#[test]
fn projections_are_deterministic() {
    let foci = [c(5.0, 5.0), c(60.0, -20.0)];
    assert_eq!(
        Projection::two_point_equidistant(foci),
        Projection::two_point_equidistant(foci)
    );
}

#[test]
fn reparameterizing_returns_a_new_value() {
    let base = Projection::two_point_equidistant([c(0.0, 0.0), c(20.0, 0.0)]);
    let scaled = base.with_scale_translate(10.0, Vec2::new(3.0, 4.0));
    assert_eq!(base.scale(), 1.0);
    assert_eq!(base.translate(), Vec2::ZERO);
    assert_eq!(scaled.scale(), 10.0);
    assert_eq!(scaled.foci(), base.foci());
}

#[test]
fn center_recovers_the_centred_coordinate() {
    let proj = Projection::two_point_equidistant([c(0.0, 0.0), c(20.0, 10.0)]);
    let target = c(12.0, 4.0);
    let t = proj.project(target).unwrap();
    let centre = proj.center(5000.0, t.to_vec2(), 1024.0).unwrap();
    assert!((centre.lon - target.lon).abs() < 1e-6);
    assert!((centre.lat - target.lat).abs() < 1e-6);
}

#[test]
fn invert_outside_the_globe_is_none() {
    let proj = Projection::two_point_equidistant([c(0.0, 0.0), c(20.0, 0.0)]);
    assert!(proj.invert(Point::new(100.0, 100.0)).is_none());
}
