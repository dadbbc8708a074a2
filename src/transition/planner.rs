use crate::foundation::core::{Vec2, canvas_size, zoom_to_scale};
use crate::graph::model::Vertex;
use crate::projection::builder::Projection;
use crate::transition::zoom::{SmoothZoom, View};

/// Width of the whole projected domain at scale 1, in projected units.
const DOMAIN_WIDTH: f64 = 4.0 / std::f64::consts::PI;

/// Camera scale and translation, as consumed by frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub scale: f64,
    /// Projected position (scale 1, translate 0) centred in the canvas.
    pub translate: Vec2,
}

/// Smooth pan/zoom between two vertices under their shared projection.
#[derive(Clone, Debug)]
pub struct TransitionPlan {
    projection: Projection,
    zoom: SmoothZoom,
}

impl TransitionPlan {
    pub fn between(from: &Vertex, to: &Vertex) -> Self {
        let projection = Projection::two_point_equidistant([from.coords, to.coords]);
        Self::with_projection(projection, from, to)
    }

    /// Plan under an already built projection (scale 1, translate 0).
    pub fn with_projection(projection: Projection, from: &Vertex, to: &Vertex) -> Self {
        let zoom = SmoothZoom::new(view_of(&projection, from), view_of(&projection, to));
        Self { projection, zoom }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn at(&self, t: f64) -> CameraState {
        let v = self.zoom.at(t);
        CameraState {
            scale: canvas_size() / v.w,
            translate: Vec2::new(v.x, v.y),
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.zoom.duration_ms()
    }
}

fn view_of(projection: &Projection, v: &Vertex) -> View {
    let p = projection.project(v.coords).unwrap_or_else(|| {
        tracing::warn!(vertex = %v.id, "vertex does not project, centring on the origin");
        Default::default()
    });
    View::new(p.x, p.y, DOMAIN_WIDTH / (zoom_to_scale(v.zoom) / 256.0))
}

#[cfg(test)]
#[path = "../../tests/unit/transition/planner.rs"]
mod tests;
