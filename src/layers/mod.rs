//! Render layers: styles, basemap definitions and per-frame clipping.

/// Overpass layer definitions for detailed OpenStreetMap data.
pub mod catalog;
/// Render layers and bounding box clipping.
pub mod model;
/// Natural Earth basemap loading and level-of-detail switching.
pub mod natural_earth;
/// Colors in the CSS notation used by layer styles.
pub mod paint;
/// Layer drawing attributes and the built-in map styles.
pub mod style;
