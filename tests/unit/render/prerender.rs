use super::*;
use crate::foundation::core::Coordinate;
use crate::spatial::geojson::{Feature, Geometry, LayerData};

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

#[test]
fn point_layers_are_deferred_and_others_recorded() {
    let proj = Projection::two_point_equidistant([c(-10.0, 0.0), c(10.0, 0.0)]);
    let layers = vec![
        RenderLayer::new(LayerStyle::new(0), LayerData::Sphere),
        RenderLayer::new(
            LayerStyle::new(5),
            LayerData::Feature(Feature::new(Geometry::Point(c(1.0, 1.0).into()))),
        ),
        RenderLayer::new(
            LayerStyle::new(3),
            LayerData::Feature(Feature::new(geo::LineString::from(vec![c(0.0, 0.0), c(2.0, 2.0)]))),
        ),
    ];

    let pre = prerender(&proj, &layers);
    assert_eq!(pre.point_layers.len(), 1);
    assert_eq!(pre.point_layers[0].style.z_index, 5);
    assert_eq!(
        pre.layers.iter().map(|l| l.style.z_index).collect::<Vec<_>>(),
        vec![0, 3]
    );
    assert!(pre.layers.iter().all(|l| !l.path.elements().is_empty()));
}

#[test]
fn no_layers_give_an_empty_result() {
    let proj = Projection::two_point_equidistant([c(-10.0, 0.0), c(10.0, 0.0)]);
    assert!(prerender(&proj, &[]).is_empty());
}
