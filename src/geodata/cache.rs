use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::sha256_hex;
use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::geodata::source::GeodataSource;
use crate::layers::catalog::{OCEANS_FROM_FILE, OverpassLayerDefinition};
use crate::layers::model::RenderLayer;
use crate::spatial::bbox::BoundingBox;
use crate::spatial::geojson::{GeometryExt, LayerData};

/// File-backed cache of geodata query results.
///
/// Entries are keyed by query, bounding box and description and are never
/// invalidated.
pub struct GeodataCache {
    root: PathBuf,
    overpass: Box<dyn GeodataSource>,
    water: Option<Box<dyn GeodataSource>>,
}

/// `<sha256>__<bbox>__<description>.geojson`, with separators in the bbox
/// and non-alphanumerics in the description replaced by `_`.
pub fn cache_file_name(query: &str, bbox: &BoundingBox, description: &str) -> String {
    let bbox_str = bbox.to_overpass_string();
    let hash = sha256_hex(&[query.as_bytes(), bbox_str.as_bytes(), description.as_bytes()]);
    let bbox_part = bbox_str.replace([':', ','], "_");
    let description_part: String = description
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{hash}__{bbox_part}__{description_part}.geojson")
}

impl GeodataCache {
    pub fn new(root: impl Into<PathBuf>, overpass: Box<dyn GeodataSource>) -> Self {
        Self {
            root: root.into(),
            overpass,
            water: None,
        }
    }

    /// Source used for the [`OCEANS_FROM_FILE`] query.
    pub fn with_water(mut self, water: Box<dyn GeodataSource>) -> Self {
        self.water = Some(water);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self, query: &str, bbox: &BoundingBox, description: &str) -> PathBuf {
        self.root.join(cache_file_name(query, bbox, description))
    }

    /// Path of the cached result, fetching it first on a miss.
    #[tracing::instrument(skip(self, query, bbox), fields(bbox = %bbox.to_overpass_string()))]
    pub fn load(
        &self,
        query: &str,
        bbox: &BoundingBox,
        description: &str,
    ) -> GeoflightResult<PathBuf> {
        let path = self.file_path(query, bbox, description);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "geodata cache hit");
            return Ok(path);
        }

        let source: &dyn GeodataSource = if query == OCEANS_FROM_FILE {
            self.water.as_deref().ok_or_else(|| {
                GeoflightError::validation(format!(
                    "layer '{description}' needs a water shapefile but none is configured"
                ))
            })?
        } else {
            &*self.overpass
        };

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create cache dir '{}'", self.root.display()))?;
        tracing::info!(source = source.name(), "geodata not cached, fetching");

        let partial = path.with_extension("geojson.partial");
        if let Err(e) = source.fetch(query, bbox, &partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
        std::fs::rename(&partial, &path)
            .with_context(|| format!("publish cache file '{}'", path.display()))?;
        Ok(path)
    }
}

/// Read a cached file as a render layer, keeping only the geometry kinds the
/// definition accepts.
pub fn read_layer_file(path: &Path, definition: &OverpassLayerDefinition) -> GeoflightResult<RenderLayer> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read geodata '{}'", path.display()))?;
    let data: LayerData = serde_json::from_str(&text).map_err(|e| {
        GeoflightError::serde(format!("parse geodata '{}': {e}", path.display()))
    })?;

    let features = match data {
        LayerData::FeatureCollection(features) => features,
        LayerData::Feature(f) => vec![f],
        LayerData::Sphere => Vec::new(),
    };
    let features = features
        .into_iter()
        .filter(|f| {
            f.geometry
                .as_ref()
                .is_some_and(|g| definition.accepts(g.geometry_type()))
        })
        .collect();

    Ok(RenderLayer::new(
        definition.style.clone(),
        LayerData::FeatureCollection(features),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/geodata/cache.rs"]
mod tests;
