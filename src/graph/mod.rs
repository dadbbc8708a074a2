//! Flight graph definition and edge naming.

/// Vertices, edges and their file-name conventions.
pub mod model;
