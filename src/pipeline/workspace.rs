use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::foundation::core::sha256_hex;
use crate::foundation::error::{GeoflightError, GeoflightResult};

/// Check that a graph name only contains letters, digits, `_` and `-`.
pub fn validate_graph_name(name: &str) -> GeoflightResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GeoflightError::validation(format!(
            "graph name '{name}' may only contain letters, numbers, underscore and dash"
        )))
    }
}

/// Working directory shared by the stages of one graph run:
/// `<cache>/<timestamp>-temp-<name>-<hash>`.
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Suffix identifying the working directory of a graph file and name.
    pub fn suffix(graph_bytes: &[u8], name: &str) -> String {
        let hash = sha256_hex(&[graph_bytes, name.as_bytes()]);
        format!("-temp-{name}-{hash}")
    }

    /// Reuse the first existing directory for this graph and name, or
    /// create a new one stamped with `timestamp`.
    pub fn locate(
        cache_root: &Path,
        graph_bytes: &[u8],
        name: &str,
        timestamp: &str,
    ) -> GeoflightResult<Self> {
        validate_graph_name(name)?;
        let suffix = Self::suffix(graph_bytes, name);

        if cache_root.is_dir() {
            let mut existing: Vec<PathBuf> = std::fs::read_dir(cache_root)
                .with_context(|| format!("list cache dir '{}'", cache_root.display()))?
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(&suffix))
                })
                .collect();
            existing.sort();
            if let Some(root) = existing.into_iter().next() {
                tracing::debug!(path = %root.display(), "reusing working directory");
                return Ok(Self { root });
            }
        }

        let root = cache_root.join(format!("{timestamp}{suffix}"));
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create working directory '{}'", root.display()))?;
        tracing::info!(path = %root.display(), "created working directory");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn edges_path(&self) -> PathBuf {
        self.root.join("edges.json")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata.json")
    }

    pub fn osm_metadata_path(&self) -> PathBuf {
        self.root.join("osm_metadata_per_edge.json")
    }

    /// Output tree published by commit.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    pub fn frames_dir(&self, edge_id: &str) -> PathBuf {
        self.root.join("frames").join(edge_id)
    }

    pub fn encoders_dir(&self) -> PathBuf {
        self.root.join("encoders")
    }
}

/// Serialize `value` to a sibling temporary file and rename it over `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> GeoflightResult<()> {
    let json = serde_json::to_vec(value)
        .map_err(|e| GeoflightError::serde(format!("serialize '{}': {e}", path.display())))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("publish '{}'", path.display()))?;
    Ok(())
}

/// Read the output of an earlier stage; missing or unreadable files are
/// reported as [`GeoflightError::MissingStage`].
pub fn read_stage_json<T: DeserializeOwned>(path: &Path, stage: &'static str) -> GeoflightResult<T> {
    let bytes = std::fs::read(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "stage output unavailable");
        GeoflightError::missing_stage(stage, path)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "stage output is corrupt");
        GeoflightError::missing_stage(stage, path)
    })
}

/// Recursive copy of a directory tree.
pub fn copy_dir_all(from: &Path, to: &Path) -> GeoflightResult<()> {
    std::fs::create_dir_all(to).with_context(|| format!("create '{}'", to.display()))?;
    let listing = std::fs::read_dir(from).with_context(|| format!("list '{}'", from.display()))?;
    for entry in listing {
        let entry = entry.with_context(|| format!("list '{}'", from.display()))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if src.is_dir() {
            copy_dir_all(&src, &dst)?;
        } else {
            std::fs::copy(&src, &dst)
                .with_context(|| format!("copy '{}' to '{}'", src.display(), dst.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/workspace.rs"]
mod tests;
