use crate::foundation::core::{Affine, BezPath, Point, canvas_size};
use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::frame::frame::Frame;
use crate::layers::paint::{Paint, Rgba8};
use crate::render::prerender::{Prerendered, RecordedLayer};

/// Radius of point symbols in canvas pixels.
pub const POINT_RADIUS: f64 = 4.5;

const BACKGROUND: Rgba8 = Rgba8::WHITE;

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Draws frames onto a square canvas with `vello_cpu`.
pub struct CpuRasterizer {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl Default for CpuRasterizer {
    fn default() -> Self {
        let size = canvas_size() as u16;
        Self::new(size, size)
    }
}

impl CpuRasterizer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        }
    }

    /// Rasterize one frame from the paths of its projection batch.
    ///
    /// Layers outside their zoom window are skipped; the rest are drawn in
    /// ascending z-index, ties keeping their input order. Returns
    /// **premultiplied** RGBA8 pixels.
    pub fn rasterize(&mut self, frame: &Frame, pre: &Prerendered) -> GeoflightResult<FrameRGBA> {
        let scale = frame.scale();
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeoflightError::geometry(format!(
                "frame {} has invalid scale {scale}",
                frame.index()
            )));
        }
        let zoom = frame.zoom;

        let points: Vec<RecordedLayer> = pre
            .point_layers
            .iter()
            .filter(|l| l.style.is_visible_at(zoom))
            .map(|l| RecordedLayer {
                style: l.style.clone(),
                path: frame.projection.point_path(&l.data, POINT_RADIUS / scale),
            })
            .collect();

        let mut drawn: Vec<&RecordedLayer> = points
            .iter()
            .chain(pre.layers.iter().filter(|l| l.style.is_visible_at(zoom)))
            .collect();
        drawn.sort_by_key(|l| l.style.z_index);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint(color_to_cpu(BACKGROUND));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        ctx.set_transform(affine_to_cpu(frame.transform));
        for layer in drawn {
            draw_layer(&mut ctx, layer, scale);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_layer(ctx: &mut vello_cpu::RenderContext, layer: &RecordedLayer, scale: f64) {
    if layer.path.elements().is_empty() {
        return;
    }
    let style = &layer.style;
    let path = bezpath_to_cpu(&layer.path);

    if let Paint::Color(fill) = style.fill_style {
        ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);
        ctx.set_paint(color_to_cpu(fill));
        ctx.fill_path(&path);
    }

    if let Paint::Color(stroke) = style.stroke_style
        && style.line_width > 0.0
    {
        let dashes: Vec<f64> = style.line_dash.iter().map(|d| d / scale).collect();
        let mut cpu_stroke = vello_cpu::kurbo::Stroke::new(style.line_width / scale);
        if dashes.iter().any(|d| *d > 0.0) {
            cpu_stroke = cpu_stroke.with_dashes(0.0, dashes);
        }
        ctx.set_stroke(cpu_stroke);
        ctx.set_paint(color_to_cpu(stroke));
        ctx.stroke_path(&path);
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
