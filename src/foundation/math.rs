use geo::{Distance, Haversine, InterpolatePoint};

use crate::foundation::core::Coordinate;

/// Sphere radius [`Haversine`] measures with, in metres.
const HAVERSINE_RADIUS: f64 = 6_371_008.8;

/// Cartesian point on (or direction from the centre of) the unit sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vec3 {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
}

impl Vec3 {
    pub(crate) const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn from_coordinate(c: Coordinate) -> Self {
        let (lon, lat) = (c.lon.to_radians(), c.lat.to_radians());
        let cos_lat = lat.cos();
        Self::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub(crate) fn to_coordinate(self) -> Coordinate {
        let lon = self.y.atan2(self.x).to_degrees();
        let lat = self.z.clamp(-1.0, 1.0).asin().to_degrees();
        Coordinate::new(lon, lat)
    }

    pub(crate) fn dot(self, o: Self) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub(crate) fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub(crate) fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub(crate) fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }

    pub(crate) fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or `None` for (near) zero vectors.
    pub(crate) fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len < 1e-15 || !len.is_finite() {
            return None;
        }
        Some(self.scale(1.0 / len))
    }

    /// Angle in radians between two unit vectors.
    pub(crate) fn angle_to(self, o: Self) -> f64 {
        self.cross(o).length().atan2(self.dot(o))
    }

    /// Any unit vector perpendicular to `self`.
    pub(crate) fn any_perpendicular(self) -> Self {
        let axis = if self.z.abs() < 0.9 {
            Self::new(0.0, 0.0, 1.0)
        } else {
            Self::new(1.0, 0.0, 0.0)
        };
        self.cross(axis)
            .normalized()
            .unwrap_or(Self::new(0.0, 1.0, 0.0))
    }
}

/// Great-circle distance between two coordinates, in radians.
pub fn great_circle_distance(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(geo::Point::from(a), geo::Point::from(b)) / HAVERSINE_RADIUS
}

/// Point at fraction `t` along the great circle from `a` to `b`.
pub fn great_circle_interpolate(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    let d = great_circle_distance(a, b);
    if d < 1e-12 || d.sin().abs() < 1e-12 {
        return a;
    }
    Haversine
        .point_at_ratio_between(geo::Point::from(a), geo::Point::from(b), t)
        .into()
}

/// Normalize an angle in degrees to `(-180, 180]`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
