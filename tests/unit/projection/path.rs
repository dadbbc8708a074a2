use super::*;
use kurbo::PathEl;

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

fn ring(coords: &[(f64, f64)]) -> Geometry {
    Geometry::Polygon(Polygon::new(LineString::from(coords.to_vec()), vec![]))
}

fn equatorial() -> Projection {
    Projection::two_point_equidistant([c(-10.0, 0.0), c(10.0, 0.0)])
}

fn count(path: &BezPath, pred: impl Fn(&PathEl) -> bool) -> usize {
    path.elements().iter().filter(|el| pred(el)).count()
}

fn all_finite(path: &BezPath) -> bool {
    path.elements().iter().all(|el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => p.x.is_finite() && p.y.is_finite(),
        PathEl::QuadTo(a, b) => [a, b].iter().all(|p| p.x.is_finite() && p.y.is_finite()),
        PathEl::CurveTo(a, b, d) => [a, b, d].iter().all(|p| p.x.is_finite() && p.y.is_finite()),
        PathEl::ClosePath => true,
    })
}

#[test]
fn sphere_projects_to_the_outline_ellipse() {
    let proj = equatorial();
    let bounds = proj.layer_path(&LayerData::Sphere).bounding_box();
    let a = std::f64::consts::PI - 10f64.to_radians();
    assert!((bounds.width() - 2.0 * a).abs() < 1e-3);
    assert!(bounds.height() < bounds.width());
}

#[test]
fn line_away_from_the_seam_stays_in_one_piece() {
    let line = Geometry::LineString(LineString::from(vec![c(0.0, 5.0), c(0.0, -5.0)]));
    let path = equatorial().geometry_path(&line);
    assert_eq!(count(&path, |el| matches!(el, PathEl::MoveTo(_))), 1);
}

#[test]
fn line_crossing_the_seam_is_cut() {
    let line = Geometry::LineString(LineString::from(vec![c(180.0, 5.0), c(180.0, -5.0)]));
    let path = equatorial().geometry_path(&line);
    assert_eq!(count(&path, |el| matches!(el, PathEl::MoveTo(_))), 2);
    assert!(all_finite(&path));
}

#[test]
fn ring_straddling_the_seam_is_closed_along_the_outline() {
    let poly = ring(&[(175.0, 5.0), (-175.0, 5.0), (-175.0, -5.0), (175.0, -5.0), (175.0, 5.0)]);
    let path = equatorial().geometry_path(&poly);
    assert_eq!(count(&path, |el| matches!(el, PathEl::ClosePath)), 2);
    assert!(all_finite(&path));
}

#[test]
fn plain_ring_is_a_single_closed_subpath() {
    let poly = ring(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 0.0)]);
    let path = equatorial().geometry_path(&poly);
    assert_eq!(count(&path, |el| matches!(el, PathEl::MoveTo(_))), 1);
    assert_eq!(count(&path, |el| matches!(el, PathEl::ClosePath)), 1);
}

#[test]
fn clip_extent_culls_subpaths_outside() {
    let poly = ring(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 0.0)]);
    let proj = equatorial().with_clip_extent(Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
    assert!(proj.geometry_path(&poly).elements().is_empty());
}

#[test]
fn point_layers_become_circles_and_other_layers_are_ignored() {
    let proj = equatorial();
    let points = LayerData::FeatureCollection(vec![
        Feature::new(geo::Point::new(0.0, 0.0)),
        Feature::new(geo::MultiPoint::from(vec![(1.0, 1.0), (2.0, 2.0)])),
    ]);
    let path = proj.point_path(&points, 0.01);
    assert_eq!(count(&path, |el| matches!(el, PathEl::ClosePath)), 3);

    let line = LayerData::Feature(Feature::new(LineString::from(vec![c(0.0, 0.0), c(1.0, 1.0)])));
    assert!(proj.point_path(&line, 0.01).elements().is_empty());
    assert!(proj.layer_path(&points).elements().is_empty());
}
