use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::encode::ffmpeg::EncodeConfig;
use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::frame::sequencer::SequencerOptions;
use crate::geodata::overpass::DEFAULT_OVERPASS_ENDPOINT;

pub const ENV_OVERPASS_ENDPOINT: &str = "GEOFLIGHT_OVERPASS_ENDPOINT";
pub const ENV_FFMPEG: &str = "GEOFLIGHT_FFMPEG";
pub const ENV_NATURAL_EARTH_DIR: &str = "GEOFLIGHT_NATURAL_EARTH_DIR";

/// Options of a graph generation run, persisted in `metadata.json` by the
/// pregenerate stage and reused by every later stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineOpts {
    #[serde(flatten)]
    pub sequencer: SequencerOptions,
    /// Published graphs land in `<out_dir>/<name>`; the list of published
    /// graphs is `graphs.json` next to `out_dir`.
    pub out_dir: PathBuf,
    pub cache_root: PathBuf,
    pub natural_earth_dir: Option<PathBuf>,
    pub water_shapefile: Option<PathBuf>,
    pub overpass_endpoint: String,
    pub overpass_timeout_secs: u64,
    pub encoder: EncodeConfig,
    /// Render projection batches of one bounding box batch in parallel.
    pub parallel_batches: bool,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            sequencer: SequencerOptions::default(),
            out_dir: PathBuf::from("client/data"),
            cache_root: PathBuf::from("cache"),
            natural_earth_dir: None,
            water_shapefile: None,
            overpass_endpoint: DEFAULT_OVERPASS_ENDPOINT.to_owned(),
            overpass_timeout_secs: 180,
            encoder: EncodeConfig::default(),
            parallel_batches: false,
        }
    }
}

impl PipelineOpts {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Options from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> GeoflightResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| GeoflightError::serde(format!("parse options '{}': {e}", path.display())))
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(endpoint) = env_non_empty(ENV_OVERPASS_ENDPOINT) {
            self.overpass_endpoint = endpoint;
        }
        if let Some(program) = env_non_empty(ENV_FFMPEG) {
            self.encoder.program = program;
        }
        if let Some(dir) = env_non_empty(ENV_NATURAL_EARTH_DIR) {
            self.natural_earth_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn validate(&self) -> GeoflightResult<()> {
        let seq = &self.sequencer;
        if !(seq.transition_speed.is_finite() && seq.transition_speed > 0.0) {
            return Err(GeoflightError::validation(
                "transition speed must be a positive number",
            ));
        }
        if self.overpass_endpoint.trim().is_empty() {
            return Err(GeoflightError::validation("overpass endpoint must be set"));
        }
        if self.overpass_timeout_secs == 0 {
            return Err(GeoflightError::validation(
                "overpass timeout must be non-zero",
            ));
        }
        self.encoder.validate()
    }

    pub fn overpass_timeout(&self) -> Duration {
        Duration::from_secs(self.overpass_timeout_secs)
    }

    /// Location of `graphs.json`.
    pub fn registry_path(&self) -> PathBuf {
        let parent = self
            .out_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        parent.join("graphs.json")
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/opts.rs"]
mod tests;
