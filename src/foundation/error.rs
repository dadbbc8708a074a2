use std::path::PathBuf;

/// Convenience result type used across geoflight.
pub type GeoflightResult<T> = Result<T, GeoflightError>;

/// Top-level error taxonomy used by pipeline and library APIs.
#[derive(thiserror::Error, Debug)]
pub enum GeoflightError {
    /// Invalid user-provided data (graph files, names, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Geometry that cannot be projected or sampled.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A stage was invoked before the stage producing its input completed.
    #[error("missing prerequisite stage '{stage}': {} is missing or unreadable", .path.display())]
    MissingStage {
        /// Name of the stage that should have produced the file.
        stage: &'static str,
        /// The file that was expected.
        path: PathBuf,
    },

    /// Failures of external collaborators (geodata fetches, encoder processes).
    #[error("external process error: {0}")]
    External(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeoflightError {
    /// Build a [`GeoflightError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GeoflightError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`GeoflightError::MissingStage`] value.
    pub fn missing_stage(stage: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingStage {
            stage,
            path: path.into(),
        }
    }

    /// Build a [`GeoflightError::External`] value.
    pub fn external(msg: impl Into<String>) -> Self {
        Self::External(msg.into())
    }

    /// Build a [`GeoflightError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<std::io::Error> for GeoflightError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(err))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
