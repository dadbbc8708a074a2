//! Renderable camera states and their sequencing along an edge.

/// A single camera state with its bounding box and pixel transform.
pub mod frame;
/// Per-edge frame plans and client metadata.
pub mod sequencer;
