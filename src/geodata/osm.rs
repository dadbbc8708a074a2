//! Conversion of Overpass `out geom` responses into GeoJSON features.

use std::collections::BTreeMap;

use geo::{Contains, Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::spatial::geojson::{Feature, Geometry};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OsmElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Way {
        id: i64,
        #[serde(default)]
        geometry: Vec<Option<LatLon>>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<OsmMember>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct OsmMember {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub geometry: Vec<Option<LatLon>>,
}

/// Tag keys that make a closed way an area rather than a closed line.
const AREA_KEYS: &[&str] = &[
    "building",
    "landuse",
    "leisure",
    "amenity",
    "natural",
    "water",
    "aeroway",
    "military",
    "place",
    "boundary",
    "tourism",
];

/// Parse a raw Overpass JSON response into features.
pub fn parse_overpass(text: &str) -> GeoflightResult<Vec<Feature>> {
    let parsed: OverpassResponse = serde_json::from_str(text)
        .map_err(|e| GeoflightError::external(format!("invalid overpass JSON: {e}")))?;
    Ok(elements_to_features(parsed.elements))
}

pub fn elements_to_features(elements: Vec<OsmElement>) -> Vec<Feature> {
    elements.into_iter().filter_map(element_to_feature).collect()
}

fn element_to_feature(element: OsmElement) -> Option<Feature> {
    let (kind, id, tags, geometry) = match element {
        OsmElement::Node { id, lat, lon, tags } => {
            // untagged nodes are way vertices, not features
            if tags.is_empty() {
                return None;
            }
            let g = Geometry::Point(Point::new(lon, lat));
            ("node", id, tags, Some(g))
        }
        OsmElement::Way { id, geometry, tags } => {
            let g = way_geometry(&to_coordinates(&geometry), &tags);
            ("way", id, tags, g)
        }
        OsmElement::Relation { id, members, tags } => {
            let g = relation_geometry(&members, &tags);
            ("relation", id, tags, g)
        }
        OsmElement::Other => return None,
    };

    let geometry = geometry?;
    let osm_id = format!("{kind}/{id}");
    let mut properties: Map<String, Value> =
        tags.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
    properties.insert("id".to_owned(), Value::String(osm_id.clone()));

    Some(Feature {
        id: Some(Value::String(osm_id)),
        geometry: Some(geometry),
        properties,
    })
}

fn to_coordinates(points: &[Option<LatLon>]) -> Vec<Coord<f64>> {
    points
        .iter()
        .flatten()
        .map(|p| Coord { x: p.lon, y: p.lat })
        .collect()
}

fn is_closed(coords: &[Coord<f64>]) -> bool {
    coords.len() >= 4 && coords.first() == coords.last()
}

fn is_area(tags: &BTreeMap<String, String>) -> bool {
    match tags.get("area").map(String::as_str) {
        Some("yes") => true,
        Some("no") => false,
        _ => {
            AREA_KEYS.iter().any(|k| tags.contains_key(*k))
                || tags.get("waterway").is_some_and(|v| v == "riverbank")
        }
    }
}

fn way_geometry(coords: &[Coord<f64>], tags: &BTreeMap<String, String>) -> Option<Geometry> {
    if coords.len() < 2 {
        return None;
    }
    let line = LineString::new(coords.to_vec());
    if is_closed(coords) && is_area(tags) {
        return Some(Geometry::Polygon(Polygon::new(line, vec![])));
    }
    Some(Geometry::LineString(line))
}

fn relation_geometry(members: &[OsmMember], tags: &BTreeMap<String, String>) -> Option<Geometry> {
    let ways = members.iter().filter(|m| m.kind == "way");
    let is_multipolygon = matches!(
        tags.get("type").map(String::as_str),
        Some("multipolygon" | "boundary")
    );

    if !is_multipolygon {
        let lines: Vec<LineString<f64>> = ways
            .map(|m| to_coordinates(&m.geometry))
            .filter(|l| l.len() >= 2)
            .map(LineString::new)
            .collect();
        return match lines.len() {
            0 => None,
            _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
        };
    }

    let (outer, inner): (Vec<&OsmMember>, Vec<&OsmMember>) =
        ways.partition(|m| m.role != "inner");
    let outer = stitch_rings(outer.iter().map(|m| to_coordinates(&m.geometry)).collect());
    let inner = stitch_rings(inner.iter().map(|m| to_coordinates(&m.geometry)).collect());
    if outer.is_empty() {
        return None;
    }

    let mut polygons: Vec<Polygon<f64>> = outer
        .into_iter()
        .map(|ring| Polygon::new(ring, vec![]))
        .collect();
    for hole in inner {
        let Some(&first) = hole.0.first() else {
            continue;
        };
        if let Some(polygon) = polygons.iter_mut().find(|p| p.contains(&Point::from(first))) {
            polygon.interiors_push(hole);
        }
    }

    if polygons.len() == 1 {
        polygons.pop().map(Geometry::Polygon)
    } else {
        Some(Geometry::MultiPolygon(MultiPolygon::new(polygons)))
    }
}

/// Join way segments sharing end points into closed rings. Segments that
/// cannot be closed are dropped.
pub(crate) fn stitch_rings(mut segments: Vec<Vec<Coord<f64>>>) -> Vec<LineString<f64>> {
    segments.retain(|s| s.len() >= 2);
    let mut rings = Vec::new();

    while let Some(mut ring) = segments.pop() {
        while !is_closed(&ring) {
            let Some(&end) = ring.last() else { break };
            let next = segments
                .iter()
                .position(|s| s.first() == Some(&end) || s.last() == Some(&end));
            let Some(i) = next else { break };
            let mut segment = segments.swap_remove(i);
            if segment.first() != Some(&end) {
                segment.reverse();
            }
            ring.extend(segment.into_iter().skip(1));
        }
        if is_closed(&ring) {
            rings.push(LineString::new(ring));
        } else {
            tracing::debug!(points = ring.len(), "dropping unclosed relation ring");
        }
    }
    rings
}

#[cfg(test)]
#[path = "../../tests/unit/geodata/osm.rs"]
mod tests;
