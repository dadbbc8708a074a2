use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::geodata::osm::parse_overpass;
use crate::geodata::source::GeodataSource;
use crate::spatial::bbox::BoundingBox;
use crate::spatial::geojson::LayerData;

pub const DEFAULT_OVERPASS_ENDPOINT: &str = "http://localhost:27080/api/interpreter";

/// Overpass API client for a single interpreter endpoint.
pub struct OverpassSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl OverpassSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> GeoflightResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoflightError::external(format!("http client init failed: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, query: String) -> GeoflightResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .map_err(|e| GeoflightError::external(format!("{}: request failed: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            GeoflightError::external(format!("{}: response read failed: {e}", self.endpoint))
        })?;
        if status.is_success() {
            return Ok(body);
        }

        let snippet: String = body.chars().take(256).collect();
        Err(GeoflightError::external(format!(
            "{}: HTTP {status}: {snippet}",
            self.endpoint
        )))
    }
}

/// Full Overpass QL request for a layer query restricted to `bbox`.
pub fn build_query(query: &str, bbox: &BoundingBox) -> String {
    format!(
        "[out:json][bbox:{}];{query}out geom;",
        bbox.to_overpass_string()
    )
}

impl GeodataSource for OverpassSource {
    fn name(&self) -> &'static str {
        "overpass"
    }

    fn fetch(&self, query: &str, bbox: &BoundingBox, dest: &Path) -> GeoflightResult<()> {
        let text = self.request(build_query(query, bbox))?;
        let features = parse_overpass(&text)?;
        tracing::debug!(features = features.len(), "overpass response converted");

        let json = serde_json::to_string(&LayerData::FeatureCollection(features))
            .map_err(|e| GeoflightError::serde(format!("serialize overpass features: {e}")))?;
        std::fs::write(dest, json).with_context(|| format!("write '{}'", dest.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geodata/overpass.rs"]
mod tests;
