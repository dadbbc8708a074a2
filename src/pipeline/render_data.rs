use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::foundation::core::MAX_NATURAL_EARTH_ZOOM;
use crate::foundation::error::GeoflightResult;
use crate::frame::frame::FrameDescriptor;
use crate::frame::sequencer::EdgeRecord;
use crate::geodata::cache::{GeodataCache, read_layer_file};
use crate::geodata::ogr::OgrSource;
use crate::geodata::overpass::OverpassSource;
use crate::layers::catalog::OverpassLayerDefinition;
use crate::layers::model::RenderLayer;
use crate::layers::style::styles;
use crate::pipeline::opts::PipelineOpts;
use crate::spatial::bbox::BoundingBox;
use crate::spatial::geojson::{Feature, LayerData};

/// A layer definition together with the cached geodata file fetched for it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OsmLayerRecord {
    #[serde(flatten)]
    pub definition: OverpassLayerDefinition,
    pub filename: PathBuf,
}

impl OsmLayerRecord {
    pub fn load(&self) -> GeoflightResult<RenderLayer> {
        read_layer_file(&self.filename, &self.definition)
    }
}

/// Geodata cache backed by the configured Overpass endpoint and, when set,
/// the OSM water shapefile.
pub fn build_geodata_cache(opts: &PipelineOpts) -> GeoflightResult<GeodataCache> {
    let overpass = OverpassSource::new(opts.overpass_endpoint.clone(), opts.overpass_timeout())?;
    let mut cache = GeodataCache::new(opts.cache_root.clone(), Box::new(overpass));
    if let Some(shapefile) = &opts.water_shapefile {
        cache = cache.with_water(Box::new(OgrSource::new(shapefile.clone())));
    }
    Ok(cache)
}

/// Union of the bounding boxes per frame key, keys in order of first
/// appearance.
pub fn union_by_key<'a>(
    frames: impl IntoIterator<Item = &'a FrameDescriptor>,
) -> Vec<(String, BoundingBox)> {
    let mut groups: Vec<(String, Vec<BoundingBox>)> = Vec::new();
    for frame in frames {
        match groups.iter_mut().find(|(key, _)| *key == frame.key) {
            Some((_, boxes)) => boxes.push(frame.bounding_box),
            None => groups.push((frame.key.clone(), vec![frame.bounding_box])),
        }
    }
    groups
        .into_iter()
        .map(|(key, boxes)| (key, BoundingBox::union(&boxes)))
        .collect()
}

/// Fetch every layer definition for every frame key that reaches the
/// definition's minimum zoom, then list the results per edge: first the
/// layers of the edge's `from` vertex, then those of its `to` vertex.
pub fn preload_layers(
    edges: &[EdgeRecord],
    definitions: &[OverpassLayerDefinition],
    cache: &GeodataCache,
) -> GeoflightResult<BTreeMap<String, Vec<OsmLayerRecord>>> {
    let frames: Vec<&FrameDescriptor> = edges
        .iter()
        .flat_map(|e| e.frames.iter().flatten().flatten())
        .collect();

    let mut per_key: BTreeMap<String, Vec<OsmLayerRecord>> = BTreeMap::new();
    for definition in definitions {
        let min_zoom = definition.min_zoom();
        let relevant = frames.iter().copied().filter(|f| f.zoom() >= min_zoom);
        for (key, bbox) in union_by_key(relevant) {
            let filename = cache.load(&definition.overpass_query, &bbox, &definition.layer_name)?;
            per_key.entry(key).or_default().push(OsmLayerRecord {
                definition: definition.clone(),
                filename,
            });
        }
    }

    Ok(edges
        .iter()
        .map(|edge| {
            let records = [&edge.metadata.from.id, &edge.metadata.to.id]
                .into_iter()
                .filter_map(|id| per_key.get(id))
                .flatten()
                .cloned()
                .collect();
            (edge.edge_id.clone(), records)
        })
        .collect())
}

/// Ocean and OSM land rectangles under the frames zoomed in past the Natural
/// Earth threshold, one pair per frame key.
///
/// The land patch is only drawn above the threshold; OSM water layers are
/// then drawn on top of it.
pub fn background_patches<'a>(
    frames: impl IntoIterator<Item = &'a FrameDescriptor>,
) -> Vec<RenderLayer> {
    let zoomed_in = frames
        .into_iter()
        .filter(|f| f.zoom() >= MAX_NATURAL_EARTH_ZOOM);
    union_by_key(zoomed_in)
        .into_iter()
        .flat_map(|(_, bbox)| {
            let patch = LayerData::Feature(Feature::new(bbox.to_polygon()));
            [
                RenderLayer::new(styles::ocean(), patch.clone()),
                RenderLayer::new(
                    styles::osm_landmass().zoom_range(Some(MAX_NATURAL_EARTH_ZOOM), None),
                    patch,
                ),
            ]
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/render_data.rs"]
mod tests;
