//! Two-point equidistant projection, oriented north-up at the foci midpoint.

/// Projection value type and its construction from a pair of foci.
pub mod builder;
/// Geometry to path conversion with seam cutting and resampling.
pub mod path;
pub(crate) mod raw;
