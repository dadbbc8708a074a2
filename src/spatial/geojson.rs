//! GeoJSON features over [`geo`] geometry, plus the d3-style `Sphere`
//! pseudo-geometry.
//!
//! Geometry is held as [`geo::Geometry`]; the GeoJSON wire shape (tagged
//! objects with `[lon, lat]` positions) only exists at the serde boundary.

use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{Map, Value};

use crate::foundation::core::Coordinate;

/// Geometry of a feature, in lon/lat degrees (`x` = longitude).
pub type Geometry = geo::Geometry<f64>;

/// GeoJSON geometry kinds, used to whitelist geometry per layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

/// GeoJSON classification of [`Geometry`] values.
pub trait GeometryExt {
    /// The GeoJSON type this geometry is written as.
    fn geometry_type(&self) -> GeometryType;

    fn is_point(&self) -> bool {
        matches!(
            self.geometry_type(),
            GeometryType::Point | GeometryType::MultiPoint
        )
    }
}

impl GeometryExt for Geometry {
    fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::MultiPoint(_) => GeometryType::MultiPoint,
            Self::Line(_) | Self::LineString(_) => GeometryType::LineString,
            Self::MultiLineString(_) => GeometryType::MultiLineString,
            Self::Polygon(_) | Self::Rect(_) | Self::Triangle(_) => GeometryType::Polygon,
            Self::MultiPolygon(_) => GeometryType::MultiPolygon,
            Self::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }
}

/// A GeoJSON feature. Properties are kept verbatim.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GeoJsonRepr", into = "GeoJsonRepr")]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            id: None,
            geometry: Some(geometry.into()),
            properties: Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Copy of this feature with a different geometry.
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            id: self.id.clone(),
            geometry: Some(geometry),
            properties: self.properties.clone(),
        }
    }

    pub fn is_point(&self) -> bool {
        self.geometry.as_ref().is_some_and(GeometryExt::is_point)
    }
}

/// Drawable data of a render layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "GeoJsonRepr", into = "GeoJsonRepr")]
pub enum LayerData {
    /// The whole globe; projects to the outline of the map.
    Sphere,
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl LayerData {
    /// True when the layer holds point features and must be projected per frame.
    pub fn is_point_layer(&self) -> bool {
        match self {
            Self::Sphere => false,
            Self::Feature(f) => f.is_point(),
            Self::FeatureCollection(features) => features.first().is_some_and(Feature::is_point),
        }
    }
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
enum GeoJsonRepr {
    Sphere,
    Feature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        geometry: Option<GeometryRepr>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    FeatureCollection {
        features: Vec<Feature>,
    },
}

type Ring = Vec<Coordinate>;

#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
enum GeometryRepr {
    Point { coordinates: Coordinate },
    MultiPoint { coordinates: Vec<Coordinate> },
    LineString { coordinates: Ring },
    MultiLineString { coordinates: Vec<Ring> },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<GeometryRepr> },
}

fn line_from(ring: Ring) -> LineString<f64> {
    ring.into_iter().map(Coord::from).collect()
}

fn line_into(line: &LineString<f64>) -> Ring {
    line.coords().map(|&c| c.into()).collect()
}

fn polygon_from(rings: Vec<Ring>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(line_from);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

fn polygon_into(polygon: &Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(line_into)
        .collect()
}

impl From<GeometryRepr> for Geometry {
    fn from(repr: GeometryRepr) -> Self {
        match repr {
            GeometryRepr::Point { coordinates } => Point::from(coordinates).into(),
            GeometryRepr::MultiPoint { coordinates } => {
                MultiPoint::new(coordinates.into_iter().map(Point::from).collect()).into()
            }
            GeometryRepr::LineString { coordinates } => line_from(coordinates).into(),
            GeometryRepr::MultiLineString { coordinates } => {
                MultiLineString::new(coordinates.into_iter().map(line_from).collect()).into()
            }
            GeometryRepr::Polygon { coordinates } => polygon_from(coordinates).into(),
            GeometryRepr::MultiPolygon { coordinates } => {
                MultiPolygon::new(coordinates.into_iter().map(polygon_from).collect()).into()
            }
            GeometryRepr::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(geo::GeometryCollection::new_from(
                    geometries.into_iter().map(Geometry::from).collect(),
                ))
            }
        }
    }
}

impl From<&Geometry> for GeometryRepr {
    fn from(g: &Geometry) -> Self {
        match g {
            Geometry::Point(p) => Self::Point {
                coordinates: (*p).into(),
            },
            Geometry::MultiPoint(mp) => Self::MultiPoint {
                coordinates: mp.iter().map(|&p| p.into()).collect(),
            },
            Geometry::Line(l) => Self::LineString {
                coordinates: vec![l.start.into(), l.end.into()],
            },
            Geometry::LineString(ls) => Self::LineString {
                coordinates: line_into(ls),
            },
            Geometry::MultiLineString(mls) => Self::MultiLineString {
                coordinates: mls.iter().map(line_into).collect(),
            },
            Geometry::Polygon(p) => Self::Polygon {
                coordinates: polygon_into(p),
            },
            Geometry::Rect(r) => Self::Polygon {
                coordinates: polygon_into(&r.to_polygon()),
            },
            Geometry::Triangle(t) => Self::Polygon {
                coordinates: polygon_into(&t.to_polygon()),
            },
            Geometry::MultiPolygon(mp) => Self::MultiPolygon {
                coordinates: mp.iter().map(polygon_into).collect(),
            },
            Geometry::GeometryCollection(gc) => Self::GeometryCollection {
                geometries: gc.iter().map(Self::from).collect(),
            },
        }
    }
}

impl TryFrom<GeoJsonRepr> for Feature {
    type Error = String;

    fn try_from(repr: GeoJsonRepr) -> Result<Self, Self::Error> {
        match repr {
            GeoJsonRepr::Feature {
                id,
                geometry,
                properties,
            } => Ok(Self {
                id,
                geometry: geometry.map(Geometry::from),
                properties: properties.unwrap_or_default(),
            }),
            GeoJsonRepr::Sphere | GeoJsonRepr::FeatureCollection { .. } => {
                Err("expected a GeoJSON object of type \"Feature\"".to_owned())
            }
        }
    }
}

impl From<Feature> for GeoJsonRepr {
    fn from(f: Feature) -> Self {
        Self::Feature {
            id: f.id,
            geometry: f.geometry.as_ref().map(GeometryRepr::from),
            properties: Some(f.properties),
        }
    }
}

impl From<GeoJsonRepr> for LayerData {
    fn from(repr: GeoJsonRepr) -> Self {
        match repr {
            GeoJsonRepr::Sphere => Self::Sphere,
            GeoJsonRepr::Feature {
                id,
                geometry,
                properties,
            } => Self::Feature(Feature {
                id,
                geometry: geometry.map(Geometry::from),
                properties: properties.unwrap_or_default(),
            }),
            GeoJsonRepr::FeatureCollection { features } => Self::FeatureCollection(features),
        }
    }
}

impl From<LayerData> for GeoJsonRepr {
    fn from(d: LayerData) -> Self {
        match d {
            LayerData::Sphere => Self::Sphere,
            LayerData::Feature(f) => f.into(),
            LayerData::FeatureCollection(features) => Self::FeatureCollection { features },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spatial/geojson.rs"]
mod tests;
