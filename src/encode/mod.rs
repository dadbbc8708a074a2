//! Background video encoding of rendered frame sequences.

/// Encoder settings and the per-edge ffmpeg script.
pub mod ffmpeg;
/// Detached encoder processes tracked on disk and joined with a timeout.
pub mod registry;
