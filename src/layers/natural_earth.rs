//! Natural Earth basemap layers, switching between the 10m, 50m and 110m
//! datasets as the camera zooms out.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::foundation::core::MAX_NATURAL_EARTH_ZOOM;
use crate::foundation::error::GeoflightResult;
use crate::layers::model::RenderLayer;
use crate::layers::style::{LayerStyle, styles};
use crate::spatial::geojson::{Feature, LayerData};

/// Zoom boundaries between the 10m, 50m and 110m datasets.
pub const LOD_ZOOM_SWITCHES: [f64; 4] = [MAX_NATURAL_EARTH_ZOOM, 5.0, 2.0, f64::NEG_INFINITY];

/// Borders are hidden below this zoom.
pub const MIN_ZOOM_BORDERS: f64 = 2.0;

/// Property holding the lowest zoom at which a feature shows.
const DEFAULT_MIN_ZOOM_KEY: &str = "min_zoom";

/// A Natural Earth theme and how to split it into render layers.
#[derive(Debug, Clone)]
pub struct NaturalEarthDefinition {
    pub file_name: &'static str,
    /// Available resolutions (10, 50, 110) from most to least detailed.
    pub levels_of_detail: &'static [u32],
    pub style: LayerStyle,
    pub total_min_zoom: Option<f64>,
    pub min_zoom_key: &'static str,
    /// Feature property whose value selects a per-group style.
    pub style_key: Option<(&'static str, fn(Option<&str>) -> LayerStyle)>,
}

impl NaturalEarthDefinition {
    fn new(file_name: &'static str, levels_of_detail: &'static [u32], style: LayerStyle) -> Self {
        Self {
            file_name,
            levels_of_detail,
            style,
            total_min_zoom: None,
            min_zoom_key: DEFAULT_MIN_ZOOM_KEY,
            style_key: None,
        }
    }

    fn min_zoom_key(mut self, key: &'static str) -> Self {
        self.min_zoom_key = key;
        self
    }

    fn total_min_zoom(mut self, zoom: f64) -> Self {
        self.total_min_zoom = Some(zoom);
        self
    }

    /// File stem for one level of detail, e.g. `ne_10m_land`.
    pub fn file_stem(&self, lod: u32) -> String {
        format!("ne_{lod}m_{}", self.file_name)
    }
}

fn road_style(featurecla: Option<&str>) -> LayerStyle {
    match featurecla {
        Some("Ferry") => styles::ferry(),
        _ => styles::main_road(),
    }
}

pub fn natural_earth_definitions() -> Vec<NaturalEarthDefinition> {
    use NaturalEarthDefinition as D;
    const ALL: &[u32] = &[10, 50, 110];
    const FINE: &[u32] = &[10, 50];
    const FINEST: &[u32] = &[10];

    let mut roads = D::new("roads", FINEST, LayerStyle::new(styles::main_road().z_index));
    roads.style_key = Some(("featurecla", road_style));

    vec![
        D::new("land", ALL, styles::landmass()),
        D::new("glaciated_areas", ALL, styles::glaciated_areas()),
        D::new("antarctic_ice_shelves_polys", FINE, styles::antarctic_ice_shelves()),
        D::new("rivers_lake_centerlines", ALL, styles::rivers()),
        D::new("lakes", ALL, styles::lakes()),
        D::new("reefs", FINEST, styles::reefs()),
        D::new("urban_areas", FINE, styles::urban_areas()),
        D::new("parks_and_protected_lands_area", FINEST, styles::national_parks())
            .min_zoom_key("scalerank"),
        D::new("railroads", FINEST, styles::railroads()).min_zoom_key("scalerank"),
        roads,
        D::new("admin_0_boundary_lines_land", ALL, styles::admin0_border())
            .total_min_zoom(MIN_ZOOM_BORDERS),
        D::new("admin_1_states_provinces_lines", ALL, styles::admin1_border())
            .total_min_zoom(MIN_ZOOM_BORDERS),
        D::new("admin_0_boundary_lines_disputed_areas", FINE, styles::admin0_contested_border())
            .total_min_zoom(MIN_ZOOM_BORDERS),
        D::new("populated_places", ALL, styles::populated_places()),
    ]
}

/// Ocean and horizon: the globe background present in every frame.
pub fn background_layers() -> Vec<RenderLayer> {
    vec![
        RenderLayer::new(styles::ocean(), LayerData::Sphere),
        RenderLayer::new(styles::horizon(), LayerData::Sphere),
    ]
}

/// Background plus every Natural Earth layer found in `dir`.
///
/// Files are looked up as `<dir>/ne_<lod>m_<name>.json`; missing files are
/// skipped with a warning. Without a directory only the background is drawn.
#[tracing::instrument(skip_all)]
pub fn load_basemap(dir: Option<&Path>) -> GeoflightResult<Vec<RenderLayer>> {
    let mut layers = background_layers();
    let Some(dir) = dir else {
        tracing::warn!("no Natural Earth directory configured, drawing the background only");
        return Ok(layers);
    };

    for def in natural_earth_definitions() {
        for (i, &lod) in def.levels_of_detail.iter().enumerate() {
            let path = dir.join(format!("{}.json", def.file_stem(lod)));
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "Natural Earth file missing, skipping");
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read Natural Earth file {}", path.display()))?;
            let data: LayerData = serde_json::from_str(&text)
                .with_context(|| format!("parse Natural Earth file {}", path.display()))?;
            let features = match data {
                LayerData::FeatureCollection(features) => features,
                LayerData::Feature(f) => vec![f],
                LayerData::Sphere => continue,
            };
            layers.extend(split_level(&def, i, features));
        }
    }
    tracing::debug!(layers = layers.len(), "basemap loaded");
    Ok(layers)
}

/// Group one level of detail by (min zoom, style key) and give each group
/// its zoom window.
pub(crate) fn split_level(
    def: &NaturalEarthDefinition,
    level: usize,
    features: Vec<Feature>,
) -> Vec<RenderLayer> {
    let max_zoom = LOD_ZOOM_SWITCHES[level];
    let lod_min_zoom = LOD_ZOOM_SWITCHES[level + 1];

    let mut groups: Vec<(GroupKey, Vec<Feature>)> = Vec::new();
    for f in features {
        let key = GroupKey {
            min_zoom: f.properties.get(def.min_zoom_key).and_then(Value::as_f64),
            style: def
                .style_key
                .and_then(|(k, _)| f.properties.get(k))
                .and_then(Value::as_str)
                .map(str::to_owned),
        };
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(f),
            None => groups.push((key, vec![f])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(key, features)| {
            let min_zoom = key
                .min_zoom
                .unwrap_or(f64::NEG_INFINITY)
                .max(lod_min_zoom)
                .max(def.total_min_zoom.unwrap_or(f64::NEG_INFINITY));
            if min_zoom >= max_zoom {
                return None;
            }
            let style = match def.style_key {
                Some((_, style_for)) => style_for(key.style.as_deref()),
                None => def.style.clone(),
            };
            let min_zoom = min_zoom.is_finite().then_some(min_zoom);
            Some(RenderLayer::new(
                style.zoom_range(min_zoom, Some(max_zoom)),
                LayerData::FeatureCollection(features),
            ))
        })
        .collect()
}

#[derive(Debug, PartialEq)]
struct GroupKey {
    min_zoom: Option<f64>,
    style: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/layers/natural_earth.rs"]
mod tests;
