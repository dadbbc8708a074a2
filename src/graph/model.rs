use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Coordinate;
use crate::foundation::error::{GeoflightError, GeoflightResult};

/// A waypoint of the flight graph.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub coords: Coordinate,
    /// Preferred zoom level when the camera rests at this vertex.
    pub zoom: f64,
}

/// Edge list: either a plain array of id pairs or a map from a name to a pair.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum EdgeList {
    Pairs(Vec<[String; 2]>),
    Named(BTreeMap<String, [String; 2]>),
}

impl Default for EdgeList {
    fn default() -> Self {
        Self::Pairs(Vec::new())
    }
}

impl EdgeList {
    pub fn pairs(&self) -> Vec<&[String; 2]> {
        match self {
            Self::Pairs(p) => p.iter().collect(),
            Self::Named(m) => m.values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Pairs(p) => p.len(),
            Self::Named(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Graph definition as loaded from disk.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Graph {
    pub vertices: BTreeMap<String, Vertex>,
    #[serde(default)]
    pub edges: EdgeList,
}

impl Graph {
    pub fn from_json_str(s: &str) -> GeoflightResult<Self> {
        let mut graph: Self = serde_json::from_str(s)
            .map_err(|e| GeoflightError::validation(format!("malformed graph definition: {e}")))?;
        graph.normalize();
        graph.validate()?;
        Ok(graph)
    }

    pub fn from_bytes(bytes: &[u8]) -> GeoflightResult<Self> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| GeoflightError::validation(format!("graph is not valid UTF-8: {e}")))?;
        Self::from_json_str(s)
    }

    pub fn load(path: &Path) -> GeoflightResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read graph {}", path.display()))?;
        let graph = Self::from_bytes(&bytes)?;
        tracing::debug!(
            vertices = graph.vertices.len(),
            edges = graph.edges.len(),
            path = %path.display(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Vertices without an explicit id take the key they are stored under.
    fn normalize(&mut self) {
        for (key, v) in &mut self.vertices {
            if v.id.is_empty() {
                v.id = key.clone();
            }
        }
    }

    pub fn validate(&self) -> GeoflightResult<()> {
        for (key, v) in &self.vertices {
            v.coords
                .validate()
                .map_err(|e| GeoflightError::validation(format!("vertex '{key}': {e}")))?;
            if !v.zoom.is_finite() {
                return Err(GeoflightError::validation(format!(
                    "vertex '{key}': zoom must be finite"
                )));
            }
        }
        for [a, b] in self.edges.pairs() {
            for id in [a, b] {
                if !self.vertices.contains_key(id) {
                    return Err(GeoflightError::validation(format!(
                        "edge [{a}, {b}] references unknown vertex '{id}'"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn vertex(&self, id: &str) -> GeoflightResult<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| GeoflightError::validation(format!("unknown vertex '{id}'")))
    }

    /// Edges with endpoints resolved and ordered so that `from.id < to.id`.
    pub fn oriented_edges(&self) -> GeoflightResult<Vec<(&Vertex, &Vertex)>> {
        self.edges
            .pairs()
            .into_iter()
            .map(|[a, b]| {
                let (a, b) = (self.vertex(a)?, self.vertex(b)?);
                Ok(if a.id <= b.id { (a, b) } else { (b, a) })
            })
            .collect()
    }
}

/// Name of the undirected edge between two vertex ids, e.g. `a__b`.
pub fn edge_name(v1: &str, v2: &str) -> String {
    let (a, b) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
    format!("{a}__{b}")
}

/// Video file name of the directed flight from `from` to `to`.
pub fn transition_name(from: &str, to: &str) -> String {
    format!("transition_{from}-{to}.webm")
}

#[cfg(test)]
#[path = "../../tests/unit/graph/model.rs"]
mod tests;
