use std::path::Path;

use crate::foundation::error::GeoflightResult;
use crate::spatial::bbox::BoundingBox;

/// A provider of vector geodata for a query and a bounding box.
///
/// Implementations write a GeoJSON `FeatureCollection` to `dest`. They are
/// only called on cache misses and are never retried.
pub trait GeodataSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self, query: &str, bbox: &BoundingBox, dest: &Path) -> GeoflightResult<()>;
}
