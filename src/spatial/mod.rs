//! Geographic value types: bounding boxes, GeoJSON and bounding-box clipping.

/// Axis-aligned lon/lat rectangles.
pub mod bbox;
/// Planar clipping of GeoJSON geometry.
pub mod clip;
/// GeoJSON feature and geometry model.
pub mod geojson;
