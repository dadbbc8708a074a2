use crate::layers::style::LayerStyle;
use crate::spatial::bbox::BoundingBox;
use crate::spatial::clip::clip_geometry;
use crate::spatial::geojson::{Feature, LayerData};

/// Geometry plus the attributes it is drawn with.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderLayer {
    #[serde(flatten)]
    pub style: LayerStyle,
    pub data: LayerData,
}

impl RenderLayer {
    pub fn new(style: LayerStyle, data: LayerData) -> Self {
        Self { style, data }
    }

    pub fn is_point_layer(&self) -> bool {
        self.data.is_point_layer()
    }

    /// Copy of this layer clipped to `bbox`, or `None` when nothing is left.
    ///
    /// The sphere is never clipped. Features without geometry or whose
    /// geometry falls outside the box are dropped.
    pub fn clipped(&self, bbox: &BoundingBox) -> Option<Self> {
        let data = match &self.data {
            LayerData::Sphere => LayerData::Sphere,
            LayerData::Feature(f) => LayerData::Feature(clip_feature(f, bbox)?),
            LayerData::FeatureCollection(features) => {
                let kept: Vec<Feature> = features.iter().filter_map(|f| clip_feature(f, bbox)).collect();
                if kept.is_empty() {
                    return None;
                }
                LayerData::FeatureCollection(kept)
            }
        };
        Some(Self {
            style: self.style.clone(),
            data,
        })
    }
}

fn clip_feature(feature: &Feature, bbox: &BoundingBox) -> Option<Feature> {
    let geometry = feature.geometry.as_ref()?;
    clip_geometry(geometry, bbox).map(|g| feature.with_geometry(g))
}

/// Clip every layer to `bbox`, dropping layers that end up empty.
pub fn clip_layers(layers: &[RenderLayer], bbox: &BoundingBox) -> Vec<RenderLayer> {
    layers.iter().filter_map(|l| l.clipped(bbox)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layers/model.rs"]
mod tests;
