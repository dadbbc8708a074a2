//! Smooth and efficient zooming and panning (van Wijk & Nuij, 2003).

/// Curvature of the zoom path; larger values zoom out further while panning.
pub const RHO: f64 = 1.4;

const EPSILON2: f64 = 1e-12;

/// A view: centre `(x, y)` and visible width `w`, all in projected units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

impl View {
    pub const fn new(x: f64, y: f64, w: f64) -> Self {
        Self { x, y, w }
    }
}

/// Optimal path between two views.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothZoom {
    from: View,
    to: View,
    rho: f64,
    path: ZoomPath,
    /// Path length `S`, signed for pure zooms.
    length: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ZoomPath {
    /// Centres coincide; only the width changes.
    Zoom,
    Arc { d1: f64, r0: f64 },
}

impl SmoothZoom {
    pub fn new(from: View, to: View) -> Self {
        Self::with_rho(from, to, RHO)
    }

    pub fn with_rho(from: View, to: View, rho: f64) -> Self {
        let rho2 = rho * rho;
        let rho4 = rho2 * rho2;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let d2 = dx * dx + dy * dy;

        if d2 < EPSILON2 {
            return Self {
                from,
                to,
                rho,
                path: ZoomPath::Zoom,
                length: (to.w / from.w).ln() / rho,
            };
        }

        let (w0, w1) = (from.w, to.w);
        let d1 = d2.sqrt();
        let b0 = (w1 * w1 - w0 * w0 + rho4 * d2) / (2.0 * w0 * rho2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - rho4 * d2) / (2.0 * w1 * rho2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
        Self {
            from,
            to,
            rho,
            path: ZoomPath::Arc { d1, r0 },
            length: (r1 - r0) / rho,
        }
    }

    /// View at `t` in `[0, 1]`. The endpoints are reproduced exactly.
    pub fn at(&self, t: f64) -> View {
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }

        let (from, rho) = (self.from, self.rho);
        let dx = self.to.x - from.x;
        let dy = self.to.y - from.y;
        let s = t * self.length;
        match self.path {
            ZoomPath::Zoom => View::new(
                from.x + t * dx,
                from.y + t * dy,
                from.w * (rho * s).exp(),
            ),
            ZoomPath::Arc { d1, r0 } => {
                let cosh_r0 = r0.cosh();
                let u = from.w / (rho * rho * d1) * (cosh_r0 * (rho * s + r0).tanh() - r0.sinh());
                View::new(
                    from.x + u * dx,
                    from.y + u * dy,
                    from.w * cosh_r0 / (rho * s + r0).cosh(),
                )
            }
        }
    }

    /// Recommended duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.length.abs() * 1000.0 * self.rho / std::f64::consts::SQRT_2
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/zoom.rs"]
mod tests;
