//! Two-point equidistant projection on a sphere rotated so that both foci lie
//! on the local equator at longitudes `-c/2` and `+c/2`.

use crate::foundation::core::Coordinate;
use crate::foundation::math::Vec3;

/// Orthonormal frame that carries geographic unit vectors into the local
/// projection frame: `m` is the midpoint of the foci, `n` the pole of the
/// great circle through them and `e = n x m` completes the basis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FocalFrame {
    m: Vec3,
    e: Vec3,
    n: Vec3,
    /// Angular distance between the foci, radians.
    c: f64,
}

impl FocalFrame {
    pub(crate) fn new(p0: Coordinate, p1: Coordinate) -> Self {
        let a = Vec3::from_coordinate(p0);
        let b = Vec3::from_coordinate(p1);
        let c = a.angle_to(b);
        let n = a
            .cross(b)
            .normalized()
            .unwrap_or_else(|| a.any_perpendicular());
        let toward_b = n.cross(a);
        let m = a
            .scale((c / 2.0).cos())
            .add(toward_b.scale((c / 2.0).sin()));
        let e = n.cross(m);
        Self { m, e, n, c }
    }

    /// Angular distance between the foci in radians.
    pub(crate) fn separation(&self) -> f64 {
        self.c
    }

    pub(crate) fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.m), v.dot(self.e), v.dot(self.n))
    }

    pub(crate) fn to_global(&self, l: Vec3) -> Vec3 {
        self.m
            .scale(l.x)
            .add(self.e.scale(l.y))
            .add(self.n.scale(l.z))
    }

    /// Local unit vector for local longitude/latitude in radians.
    pub(crate) fn local_from_angles(lambda: f64, phi: f64) -> Vec3 {
        let cos_phi = phi.cos();
        Vec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
    }

    /// Planar position of a local unit vector, y pointing to the local north.
    pub(crate) fn forward(&self, l: Vec3) -> (f64, f64) {
        let h = self.c / 2.0;
        let fa = Self::local_from_angles(-h, 0.0);
        let fb = Self::local_from_angles(h, 0.0);
        let za = l.angle_to(fa);
        let zb = l.angle_to(fb);

        if self.c < 1e-12 {
            // Coincident foci degenerate to the azimuthal equidistant projection.
            let rho = za;
            let az = l.y.atan2(l.z);
            return (rho * az.sin(), rho * az.cos());
        }

        let x = (za * za - zb * zb) / (2.0 * self.c);
        let dx = x + h;
        let y = (za * za - dx * dx).max(0.0).sqrt();
        let y = if l.z < 0.0 { -y } else { y };
        (x, y)
    }

    /// Local unit vector for a planar position, or `None` outside the map.
    pub(crate) fn inverse(&self, x: f64, y: f64) -> Option<Vec3> {
        let h = self.c / 2.0;
        if self.c < 1e-12 {
            let rho = x.hypot(y);
            if rho > std::f64::consts::PI {
                return None;
            }
            if rho < 1e-15 {
                return Some(Vec3::new(1.0, 0.0, 0.0));
            }
            let (sin_r, cos_r) = rho.sin_cos();
            let (ux, uz) = (x / rho, y / rho);
            return Some(Vec3::new(cos_r, sin_r * ux, sin_r * uz));
        }

        let za = (x + h).hypot(y);
        let zb = (x - h).hypot(y);
        let pi = std::f64::consts::PI;
        if za > pi + 1e-9 || zb > pi + 1e-9 || za + zb > 2.0 * pi - self.c + 1e-9 {
            return None;
        }

        let (sin_h, cos_h) = h.sin_cos();
        if cos_h.abs() < 1e-12 {
            return None;
        }
        let (ca, cb) = (za.cos(), zb.cos());
        let lx = (ca + cb) / (2.0 * cos_h);
        let ly = (cb - ca) / (2.0 * sin_h);
        let rem = 1.0 - lx * lx - ly * ly;
        if rem < -1e-9 {
            return None;
        }
        let lz = rem.max(0.0).sqrt();
        let lz = if y < 0.0 { -lz } else { lz };

        let v = Vec3::new(lx, ly, lz).normalized()?;
        (v.x.is_finite() && v.y.is_finite() && v.z.is_finite()).then_some(v)
    }

    /// Semi-axes `(a, b)` of the elliptical map outline.
    pub(crate) fn outline_radii(&self) -> (f64, f64) {
        let h = self.c / 2.0;
        let a = std::f64::consts::PI - h;
        let b = (a * a - h * h).max(0.0).sqrt();
        (a, b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/raw.rs"]
mod tests;
