//! Detailed vector geodata for high-zoom frames, fetched once and cached on disk.

/// On-disk cache keyed by query, bounding box and description.
pub mod cache;
/// `ogr2ogr` extraction from a local water polygon shapefile.
pub mod ogr;
/// OSM element to GeoJSON conversion.
pub mod osm;
/// Overpass API client.
pub mod overpass;
/// The provider trait implemented by every geodata backend.
pub mod source;
