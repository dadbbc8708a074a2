//! Camera motion between two vertices: easing and the smooth zoom planner.

/// Easing curves for rotation phases.
pub mod ease;
/// Scale/translate planning between two vertices.
pub mod planner;
/// Van Wijk & Nuij optimal zoom path.
pub mod zoom;
