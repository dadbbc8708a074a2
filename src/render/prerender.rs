use crate::foundation::core::BezPath;
use crate::layers::model::RenderLayer;
use crate::layers::style::LayerStyle;
use crate::projection::builder::Projection;

/// A layer projected once into a reusable path.
#[derive(Clone, Debug)]
pub struct RecordedLayer {
    pub style: LayerStyle,
    pub path: BezPath,
}

/// Paths shared by every frame of a projection batch.
///
/// Point layers are kept as data: their symbol radius depends on the frame
/// scale, so they are projected when each frame is rasterized.
#[derive(Clone, Debug, Default)]
pub struct Prerendered {
    pub layers: Vec<RecordedLayer>,
    pub point_layers: Vec<RenderLayer>,
}

impl Prerendered {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.point_layers.is_empty()
    }
}

/// Project every non-point layer through `projection`.
pub fn prerender(projection: &Projection, layers: &[RenderLayer]) -> Prerendered {
    let (point_layers, other): (Vec<&RenderLayer>, Vec<&RenderLayer>) =
        layers.iter().partition(|l| l.is_point_layer());

    let layers = other
        .into_iter()
        .map(|l| RecordedLayer {
            style: l.style.clone(),
            path: projection.layer_path(&l.data),
        })
        .collect();

    Prerendered {
        layers,
        point_layers: point_layers.into_iter().cloned().collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/prerender.rs"]
mod tests;
