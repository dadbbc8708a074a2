use crate::foundation::core::{Affine, Coordinate, Point, Rect, Vec2};
use crate::foundation::math::{Vec3, great_circle_distance, great_circle_interpolate};
use crate::projection::raw::FocalFrame;

/// Foci closer than this (degrees) make the projection numerically unstable.
pub const MIN_FOCI_DISTANCE_DEGREES: f64 = 8.0;

/// Margin (degrees) added around the seam between the two antipodes of the foci.
pub const SEAM_EPSILON_DEGREES: f64 = 0.01;

/// Default adaptive resampling tolerance, in output units.
pub const DEFAULT_PRECISION: f64 = 1e-4;

/// A two-point equidistant projection with a planar rotation, scale,
/// translation and an optional clip extent.
///
/// Projections are immutable values: `with_*` methods return a re-parameterized
/// copy and leave the receiver untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    foci: [Coordinate; 2],
    pub(crate) frame: FocalFrame,
    angle: f64,
    scale: f64,
    translate: Vec2,
    clip_extent: Option<Rect>,
    precision: f64,
}

impl Projection {
    /// Build the oriented projection for a pair of foci.
    ///
    /// Foci at or below [`MIN_FOCI_DISTANCE_DEGREES`] apart get the second focus
    /// moved towards the equator; the westernmost focus always comes first; and
    /// the planar angle is chosen so that north at the foci midpoint points up.
    pub fn two_point_equidistant(foci: [Coordinate; 2]) -> Self {
        let [mut p1, mut p2] = foci;

        let distance = great_circle_distance(p1, p2);
        let identical = distance == 0.0;
        if distance.to_degrees() <= MIN_FOCI_DISTANCE_DEGREES {
            tracing::debug!(
                lon = p2.lon,
                lat = p2.lat,
                "foci too close for a two-point projection, moving the second one"
            );
            let shift = if p2.lat > 0.0 {
                -MIN_FOCI_DISTANCE_DEGREES
            } else {
                MIN_FOCI_DISTANCE_DEGREES
            };
            p2 = Coordinate::new(p2.lon, p2.lat + shift);
        }

        if p1.lon > p2.lon {
            std::mem::swap(&mut p1, &mut p2);
        }

        let mut proj = Self {
            foci: [p1, p2],
            frame: FocalFrame::new(p1, p2),
            angle: 0.0,
            scale: 1.0,
            translate: Vec2::ZERO,
            clip_extent: None,
            precision: DEFAULT_PRECISION,
        };

        let anchor = if identical {
            p1
        } else {
            great_circle_interpolate(p1, p2, 0.5)
        };
        let angle = proj.azimuth_to_pole(anchor);
        if angle.is_finite() {
            proj.angle = angle;
        } else {
            tracing::error!(?p1, ?p2, "azimuth calculation failed, leaving the projection unrotated");
        }
        proj
    }

    /// Foci after perturbation and reordering.
    pub fn foci(&self) -> [Coordinate; 2] {
        self.foci
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Planar rotation in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn clip_extent(&self) -> Option<Rect> {
        self.clip_extent
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn with_scale_translate(&self, scale: f64, translate: Vec2) -> Self {
        Self {
            scale,
            translate,
            ..self.clone()
        }
    }

    pub fn with_clip_extent(&self, clip_extent: Option<Rect>) -> Self {
        Self {
            clip_extent,
            ..self.clone()
        }
    }

    pub fn with_precision(&self, precision: f64) -> Self {
        Self {
            precision,
            ..self.clone()
        }
    }

    /// Map from raw projected coordinates (y pointing north) to output space.
    pub fn affine(&self) -> Affine {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let k = self.scale;
        Affine::new([
            k * cos,
            -k * sin,
            -k * sin,
            -k * cos,
            self.translate.x,
            self.translate.y,
        ])
    }

    pub(crate) fn project_local(&self, local: Vec3) -> Point {
        let (x, y) = self.frame.forward(local);
        self.affine() * Point::new(x, y)
    }

    /// Forward mapping. Returns `None` only for non-finite input or output.
    pub fn project(&self, c: Coordinate) -> Option<Point> {
        if !c.is_finite() {
            return None;
        }
        let p = self.project_local(self.frame.to_local(Vec3::from_coordinate(c)));
        (p.x.is_finite() && p.y.is_finite()).then_some(p)
    }

    /// Inverse mapping. Returns `None` for points outside the projected globe.
    pub fn invert(&self, p: Point) -> Option<Coordinate> {
        let affine = self.affine();
        if affine.determinant().abs() < f64::EPSILON {
            return None;
        }
        let raw = affine.inverse() * p;
        let local = self.frame.inverse(raw.x, raw.y)?;
        let c = self.frame.to_global(local).to_coordinate();
        c.is_finite().then_some(c)
    }

    /// Screen angle, in degrees, between image-up and the direction towards
    /// slightly higher latitude at `c`.
    pub fn azimuth(&self, c: Coordinate) -> f64 {
        let (north, flip) = if c.lat + 1e-3 <= 90.0 {
            (Coordinate::new(c.lon, c.lat + 1e-3), false)
        } else {
            (Coordinate::new(c.lon, c.lat - 1e-3), true)
        };
        let az = self.azimuth_between(c, north);
        if flip { az + 180.0 } else { az }
    }

    fn azimuth_to_pole(&self, c: Coordinate) -> f64 {
        self.azimuth_between(c, Coordinate::new(0.0, 90.0))
    }

    fn azimuth_between(&self, from: Coordinate, to: Coordinate) -> f64 {
        match (self.project(from), self.project(to)) {
            (Some(a), Some(b)) => (b.y - a.y).atan2(b.x - a.x).to_degrees() + 90.0,
            _ => f64::NAN,
        }
    }

    /// Geographic point at the canvas centre when the raw plane point `t` is
    /// centred at scale `scale` on a canvas of edge `canvas`.
    pub fn center(&self, scale: f64, t: Vec2, canvas: f64) -> Option<Coordinate> {
        let centred = self.with_scale_translate(
            scale,
            Vec2::new(-t.x * scale + canvas / 2.0, -t.y * scale + canvas / 2.0),
        );
        centred.invert(Point::new(canvas / 2.0, canvas / 2.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/builder.rs"]
mod tests;
