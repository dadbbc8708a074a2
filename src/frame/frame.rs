use crate::foundation::core::{Affine, Coordinate, Point, Vec2, canvas_size, scale_to_zoom};
use crate::projection::builder::Projection;
use crate::spatial::bbox::BoundingBox;

/// Fraction of the scale used when sampling the bounding box, leaving a margin.
const BBOX_PADDING: f64 = 0.99;

/// Serializable description of one frame. The projection is rebuilt from
/// `foci` when the frame is brought back to life.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
    pub bounding_box: BoundingBox,
    #[serde(alias = "projectionNodes")]
    pub foci: [Coordinate; 2],
    pub scale: f64,
    pub translate: [f64; 2],
    /// Id of the vertex whose geodata this frame draws.
    pub key: String,
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub post_rotation: f64,
}

impl FrameDescriptor {
    pub fn zoom(&self) -> f64 {
        scale_to_zoom(self.scale)
    }
}

/// A frame ready to be rendered.
#[derive(Clone, Debug)]
pub struct Frame {
    pub descriptor: FrameDescriptor,
    pub projection: Projection,
    pub transform: Affine,
    pub zoom: f64,
}

/// Zero-padded frame file stem.
pub fn frame_name(index: usize) -> String {
    format!("{index:04}")
}

impl Frame {
    /// Build a frame, sampling its geographic bounding box from the projection.
    pub fn new(
        projection: Projection,
        foci: [Coordinate; 2],
        scale: f64,
        translate: Vec2,
        key: impl Into<String>,
        index: usize,
        post_rotation: f64,
    ) -> Self {
        let bounding_box = sample_bounding_box(&projection, scale, translate, post_rotation);
        let descriptor = FrameDescriptor {
            bounding_box,
            foci,
            scale,
            translate: [translate.x, translate.y],
            key: key.into(),
            index,
            name: frame_name(index),
            post_rotation,
        };
        Self::with_projection(descriptor, projection)
    }

    /// Rebuild a live frame from its descriptor; the stored bounding box is kept.
    pub fn from_descriptor(descriptor: FrameDescriptor) -> Self {
        let projection = Projection::two_point_equidistant(descriptor.foci);
        Self::with_projection(descriptor, projection)
    }

    fn with_projection(descriptor: FrameDescriptor, projection: Projection) -> Self {
        let [tx, ty] = descriptor.translate;
        let transform = pixel_transform(descriptor.scale, Vec2::new(tx, ty), descriptor.post_rotation);
        let zoom = descriptor.zoom();
        Self {
            descriptor,
            projection,
            transform,
            zoom,
        }
    }

    pub fn index(&self) -> usize {
        self.descriptor.index
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.descriptor.bounding_box
    }

    pub fn scale(&self) -> f64 {
        self.descriptor.scale
    }

    /// Canvas corners mapped back into projected (scale 1) coordinates.
    pub fn corners(&self) -> [Point; 4] {
        let inv = self.transform.inverse();
        let c = canvas_size();
        [
            inv * Point::new(0.0, 0.0),
            inv * Point::new(0.0, c),
            inv * Point::new(c, c),
            inv * Point::new(c, 0.0),
        ]
    }
}

/// Projected (scale 1) coordinates to canvas pixels: centre `translate`,
/// scale, then rotate by `post_rotation` degrees around the canvas centre.
pub fn pixel_transform(scale: f64, translate: Vec2, post_rotation: f64) -> Affine {
    let half = canvas_size() / 2.0;
    Affine::translate((half, half))
        * Affine::scale(scale)
        * Affine::rotate(post_rotation.to_radians())
        * Affine::translate(-translate)
}

/// Geographic extent visible in a frame, padded for its rotation.
///
/// The box widens to the whole globe when any canvas edge point falls off
/// the projected disc, and reaches a pole with full longitudes when that
/// pole is on the canvas. Longitudes are not unwrapped otherwise, so boxes
/// straddling the antimeridian come out far too wide.
pub fn sample_bounding_box(
    projection: &Projection,
    scale: f64,
    translate: Vec2,
    post_rotation: f64,
) -> BoundingBox {
    let theta = (post_rotation.abs() % 90.0).to_radians();
    let growth = theta.cos() + theta.sin();
    let padded = BBOX_PADDING * scale / growth;

    let c = canvas_size();
    let sampler = projection.with_scale_translate(
        padded,
        Vec2::new(-translate.x * padded + c / 2.0, -translate.y * padded + c / 2.0),
    );

    let ticks = (0..=10).map(|i| f64::from(i) * c / 10.0);
    let samples = ticks.flat_map(|t| {
        [
            Point::new(0.0, t),
            Point::new(t, 0.0),
            Point::new(c, t),
            Point::new(t, c),
        ]
    });
    let found: Option<Vec<Coordinate>> = samples.map(|p| sampler.invert(p)).collect();
    let Some(mut bbox) = found.and_then(BoundingBox::from_coordinates) else {
        tracing::debug!(scale, "canvas edge leaves the globe, using the full extent");
        return BoundingBox::WORLD;
    };

    let on_canvas = |lat: f64| {
        sampler
            .project(Coordinate::new(0.0, lat))
            .is_some_and(|p| (0.0..=c).contains(&p.x) && (0.0..=c).contains(&p.y))
    };
    if on_canvas(90.0) {
        bbox = BoundingBox::new(bbox.south, -180.0, 90.0, 180.0);
    }
    if on_canvas(-90.0) {
        bbox = BoundingBox::new(-90.0, -180.0, bbox.north, 180.0);
    }
    bbox
}

#[cfg(test)]
#[path = "../../tests/unit/frame/frame.rs"]
mod tests;
