//! Planar lon/lat clipping of geometry to a bounding box.
//!
//! Areas are intersected with the box polygon and lines clipped against it,
//! both through [`geo::BooleanOps`].

use geo::{BooleanOps, LineString, MultiLineString, MultiPolygon, Polygon};

use crate::spatial::bbox::BoundingBox;
use crate::spatial::geojson::Geometry;

/// Clip `geometry` to `bbox`. Returns `None` when nothing remains.
///
/// Points pass through untouched, whether or not they lie inside the box.
pub fn clip_geometry(geometry: &Geometry, bbox: &BoundingBox) -> Option<Geometry> {
    let window = MultiPolygon::new(vec![bbox.to_polygon()]);
    clip_with(geometry, &window)
}

fn clip_with(geometry: &Geometry, window: &MultiPolygon<f64>) -> Option<Geometry> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Some(geometry.clone()),
        Geometry::Line(l) => clip_lines(window, vec![LineString::from(*l)]),
        Geometry::LineString(ls) => clip_lines(window, vec![ls.clone()]),
        Geometry::MultiLineString(mls) => clip_lines(window, mls.0.clone()),
        Geometry::Polygon(p) => clip_areas(window, vec![p.clone()]),
        Geometry::Rect(r) => clip_areas(window, vec![r.to_polygon()]),
        Geometry::Triangle(t) => clip_areas(window, vec![t.to_polygon()]),
        Geometry::MultiPolygon(mp) => clip_areas(window, mp.0.clone()),
        Geometry::GeometryCollection(gc) => {
            let kept: Vec<Geometry> = gc.iter().filter_map(|g| clip_with(g, window)).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Geometry::GeometryCollection(geo::GeometryCollection::new_from(kept)))
            }
        }
    }
}

fn clip_lines(window: &MultiPolygon<f64>, lines: Vec<LineString<f64>>) -> Option<Geometry> {
    let clipped = window.clip(&MultiLineString::new(lines), false);
    let mut parts: Vec<LineString<f64>> = clipped
        .into_iter()
        .filter(|part| part.0.len() >= 2)
        .collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
    }
}

fn clip_areas(window: &MultiPolygon<f64>, polygons: Vec<Polygon<f64>>) -> Option<Geometry> {
    let clipped = MultiPolygon::new(polygons).intersection(window);
    let mut parts: Vec<Polygon<f64>> = clipped
        .into_iter()
        .filter(|part| part.exterior().0.len() >= 4)
        .collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(parts))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spatial/clip.rs"]
mod tests;
