//! Frame rendering: per-batch path recording, CPU rasterization and PNG output.

/// `vello_cpu` rasterizer for recorded layers.
pub mod cpu;
/// PNG encoding of rasterized frames.
pub mod png;
/// Projection of layers into paths shared by a projection batch.
pub mod prerender;
