//! Staged graph generation: pregenerate, preload, render and commit, sharing
//! a content-addressed working directory on disk.

/// Run options and their environment overrides.
pub mod opts;
/// Layer assembly for an edge: cached OSM layers and background patches.
pub mod render_data;
/// The four stages, edge rendering and the single-frame test image.
pub mod stages;
/// Working directory layout and atomic JSON files.
pub mod workspace;
