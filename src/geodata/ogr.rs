use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::geodata::source::GeodataSource;
use crate::spatial::bbox::BoundingBox;

/// Extracts polygons inside a bounding box from a local shapefile with `ogr2ogr`.
pub struct OgrSource {
    program: PathBuf,
    shapefile: PathBuf,
}

impl OgrSource {
    pub fn new(shapefile: impl Into<PathBuf>) -> Self {
        Self::with_program("ogr2ogr", shapefile)
    }

    pub fn with_program(program: impl Into<PathBuf>, shapefile: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            shapefile: shapefile.into(),
        }
    }

    pub fn args(&self, bbox: &BoundingBox, dest: &Path) -> Vec<String> {
        let window = bbox.to_ogr_args();
        let mut args: Vec<String> = ["-of", "GeoJSON", "-t_srs", "crs:84", "-clipsrc"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        args.extend(window.iter().cloned());
        args.push("-spat".to_owned());
        args.extend(window.iter().cloned());
        args.push(dest.display().to_string());
        args.push(self.shapefile.display().to_string());
        args
    }
}

impl GeodataSource for OgrSource {
    fn name(&self) -> &'static str {
        "ogr2ogr"
    }

    fn fetch(&self, _query: &str, bbox: &BoundingBox, dest: &Path) -> GeoflightResult<()> {
        let output = Command::new(&self.program)
            .args(self.args(bbox, dest))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                GeoflightError::external(format!(
                    "failed to spawn '{}': {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeoflightError::external(format!(
                "'{}' exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        if !dest.is_file() {
            return Err(GeoflightError::external(format!(
                "'{}' produced no output at '{}'",
                self.program.display(),
                dest.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geodata/ogr.rs"]
mod tests;
