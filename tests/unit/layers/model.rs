use super::*;
use crate::foundation::core::Coordinate;
use crate::spatial::geojson::Geometry;

fn c(lon: f64, lat: f64) -> Coordinate {
    Coordinate::new(lon, lat)
}

fn bbox() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 10.0, 10.0)
}

fn line(a: Coordinate, b: Coordinate) -> Feature {
    Feature::new(Geometry::LineString(geo::LineString::from(vec![a, b])))
}

#[test]
fn sphere_passes_through() {
    let layer = RenderLayer::new(LayerStyle::new(0), LayerData::Sphere);
    assert_eq!(layer.clipped(&bbox()), Some(layer.clone()));
}

#[test]
fn features_outside_are_dropped_and_style_kept() {
    let style = LayerStyle::new(7).line_width(3.0);
    let layer = RenderLayer::new(
        style.clone(),
        LayerData::FeatureCollection(vec![
            line(c(1.0, 1.0), c(2.0, 2.0)),
            line(c(20.0, 20.0), c(30.0, 30.0)),
            Feature {
                id: None,
                geometry: None,
                properties: Default::default(),
            },
        ]),
    );
    let clipped = layer.clipped(&bbox()).unwrap();
    assert_eq!(clipped.style, style);
    let LayerData::FeatureCollection(features) = &clipped.data else {
        panic!("expected a collection");
    };
    assert_eq!(features.len(), 1);
    // The input is left untouched.
    let LayerData::FeatureCollection(original) = &layer.data else {
        unreachable!()
    };
    assert_eq!(original.len(), 3);
}

#[test]
fn empty_collections_drop_the_layer() {
    let layers = vec![
        RenderLayer::new(
            LayerStyle::new(1),
            LayerData::FeatureCollection(vec![line(c(20.0, 20.0), c(30.0, 30.0))]),
        ),
        RenderLayer::new(LayerStyle::new(2), LayerData::Sphere),
    ];
    let kept = clip_layers(&layers, &bbox());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].style.z_index, 2);
}

#[test]
fn points_outside_the_box_are_kept() {
    let layer = RenderLayer::new(
        LayerStyle::new(40),
        LayerData::Feature(Feature::new(Geometry::Point(c(50.0, 50.0).into()))),
    );
    assert!(layer.clipped(&bbox()).is_some());
    assert!(layer.is_point_layer());
}
