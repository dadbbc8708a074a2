use crate::foundation::error::{GeoflightError, GeoflightResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Edge length of the square output canvas in pixels.
pub const CANVAS_SIZE: u16 = 1024;

/// Frames per second of the encoded flight videos.
pub const FRAME_RATE: u32 = 60;

/// Frames whose zoom is at or below this level are drawn from Natural Earth data only.
pub const MAX_NATURAL_EARTH_ZOOM: f64 = 8.0;

/// Projection scale corresponding to zoom level 0.
pub const SCALE_FACTOR: f64 = 128.0 / std::f64::consts::PI;

/// Canvas edge length as a float, for projection math.
pub fn canvas_size() -> f64 {
    f64::from(CANVAS_SIZE)
}

/// Convert a raw projection scale to a zoom level.
pub fn scale_to_zoom(scale: f64) -> f64 {
    (scale / SCALE_FACTOR).log2()
}

/// Convert a zoom level to a raw projection scale.
pub fn zoom_to_scale(zoom: f64) -> f64 {
    zoom.exp2() * SCALE_FACTOR
}

/// Lowercase hex SHA-256 of the concatenated `parts`.
pub fn sha256_hex(parts: &[&[u8]]) -> String {
    use sha2::Digest as _;

    let mut hasher = sha2::Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// A longitude/latitude pair in degrees, serialized as `[lon, lat]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    pub fn validate(self) -> GeoflightResult<()> {
        if !self.is_finite() {
            return Err(GeoflightError::validation(format!(
                "coordinate [{}, {}] must be finite",
                self.lon, self.lat
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeoflightError::validation(format!(
                "latitude {} is outside [-90, 90]",
                self.lat
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    // GeoJSON positions may carry an altitude; only lon/lat are kept.
    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!(
                "coordinate must have at least [lon, lat], got {} values",
                v.len()
            )),
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Coord {
            x: c.lon,
            y: c.lat,
        }
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(p: geo::Point<f64>) -> Self {
        p.0.into()
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lon, c.lat)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
