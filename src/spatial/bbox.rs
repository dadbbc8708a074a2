use geo::{Coord, Polygon, Rect};

use crate::foundation::core::Coordinate;

/// Axis-aligned geographic rectangle in degrees.
///
/// Longitudes are taken at face value: a box that crosses the antimeridian is not
/// normalized and will span the whole globe the long way round.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: Self = Self::new(-90.0, -180.0, 90.0, 180.0);

    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box containing all coordinates, or `None` for an empty input.
    pub fn from_coordinates(coords: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut it = coords.into_iter();
        let first = it.next()?;
        let mut b = Self::new(first.lat, first.lon, first.lat, first.lon);
        for c in it {
            b.south = b.south.min(c.lat);
            b.north = b.north.max(c.lat);
            b.west = b.west.min(c.lon);
            b.east = b.east.max(c.lon);
        }
        Some(b)
    }

    /// Per-axis min/max over all boxes. An empty input yields the zero box.
    pub fn union<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Self {
        boxes
            .into_iter()
            .copied()
            .reduce(|a, b| Self {
                south: a.south.min(b.south),
                west: a.west.min(b.west),
                north: a.north.max(b.north),
                east: a.east.max(b.east),
            })
            .unwrap_or(Self::new(0.0, 0.0, 0.0, 0.0))
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.lat >= self.south && c.lat <= self.north && c.lon >= self.west && c.lon <= self.east
    }

    /// `"south,west,north,east"` with six decimals, as Overpass expects.
    pub fn to_overpass_string(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.south, self.west, self.north, self.east
        )
    }

    /// `[west, south, east, north]` with six decimals, as `ogr2ogr -spat` expects.
    pub fn to_ogr_args(&self) -> [String; 4] {
        [
            format!("{:.6}", self.west),
            format!("{:.6}", self.south),
            format!("{:.6}", self.east),
            format!("{:.6}", self.north),
        ]
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(r: Rect<f64>) -> Self {
        Self::new(r.min().y, r.min().x, r.max().y, r.max().x)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.south, b.west, b.north, b.east]
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_overpass_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spatial/bbox.rs"]
mod tests;
