use super::*;
use crate::foundation::core::{Coordinate, scale_to_zoom};

fn vertex(id: &str, lon: f64, lat: f64, zoom: f64) -> Vertex {
    Vertex {
        id: id.to_owned(),
        label: id.to_owned(),
        coords: Coordinate::new(lon, lat),
        zoom,
    }
}

#[test]
fn endpoints_centre_the_vertices_at_their_zoom() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 6.0);
    let plan = TransitionPlan::between(&a, &b);

    let start = plan.at(0.0);
    let pa = plan.projection().project(a.coords).unwrap();
    assert_eq!(start.translate, pa.to_vec2());
    // Canvas scale relates to the vertex zoom by a constant offset of log2(pi).
    let offset = std::f64::consts::PI.log2();
    assert!((scale_to_zoom(start.scale) - (4.0 + offset)).abs() < 1e-9);

    let end = plan.at(1.0);
    let pb = plan.projection().project(b.coords).unwrap();
    assert_eq!(end.translate, pb.to_vec2());
    assert!((scale_to_zoom(end.scale) - (6.0 + offset)).abs() < 1e-9);
}

#[test]
fn duration_is_positive_and_zooms_out_midway() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = TransitionPlan::between(&a, &b);
    assert!(plan.duration_ms() > 0.0);
    assert!(plan.at(0.5).scale < plan.at(0.0).scale);
}

#[test]
fn same_vertex_is_a_standstill() {
    let a = vertex("A", 5.0, 5.0, 4.0);
    let plan = TransitionPlan::between(&a, &a);
    assert_eq!(plan.duration_ms(), 0.0);
    assert_eq!(plan.at(0.3), plan.at(0.0));
}
