//! Geoflight renders camera flights between waypoints of a geographic graph.
//!
//! Every edge of a graph becomes a pair of WebM videos (forward and backward)
//! plus per-frame camera metadata, so a client can play smooth transitions
//! between any two adjacent waypoints.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: every edge is sequenced into frames (rotation, pause, pan/zoom,
//!    pause, rotation), each frame carrying a two-point equidistant projection
//!    and a pixel transform.
//! 2. **Preload**: detailed OpenStreetMap layers are fetched for every zoomed-in
//!    frame group and cached on disk.
//! 3. **Render**: layers are clipped once per bounding box batch, projected once
//!    per projection batch and rasterized per frame into PNG files.
//! 4. **Encode** and **commit**: a detached `ffmpeg` job turns the frames into
//!    videos; commit waits for all of them and publishes the output tree.
//!
//! Each stage is a separate call (see [`GraphPipeline`]) that reads the
//! previous stage's output from disk, so one process never holds more than a
//! single edge in memory.
#![forbid(unsafe_code)]

mod foundation;

/// Background WebM encoding of rendered frame sequences.
pub mod encode;
/// Frames and their sequencing along an edge.
pub mod frame;
/// Overpass and shapefile geodata behind an on-disk cache.
pub mod geodata;
/// Flight graph definition.
pub mod graph;
/// Render layers, styles and basemap definitions.
pub mod layers;
/// Staged generation of a whole graph.
pub mod pipeline;
/// Two-point equidistant projection.
pub mod projection;
/// Prerendering, rasterization and PNG output.
pub mod render;
/// Bounding boxes, GeoJSON on `geo` types, and clipping.
pub mod spatial;
/// Camera motion planning between two vertices.
pub mod transition;

pub use encode::ffmpeg::{EncodeConfig, EncodeJob};
pub use encode::registry::EncoderRegistry;
pub use foundation::core::{
    Affine, BezPath, CANVAS_SIZE, Coordinate, FRAME_RATE, MAX_NATURAL_EARTH_ZOOM, Point, Rect,
    Vec2, canvas_size, scale_to_zoom, sha256_hex, zoom_to_scale,
};
pub use foundation::error::{GeoflightError, GeoflightResult};
pub use foundation::math::{great_circle_distance, great_circle_interpolate, normalize_degrees};
pub use frame::frame::{Frame, FrameDescriptor};
pub use frame::sequencer::{EdgeMetadata, EdgePlan, EdgeRecord, SequencerOptions, sequence_edge, sequence_still};
pub use geodata::cache::GeodataCache;
pub use geodata::source::GeodataSource;
pub use graph::model::{Graph, Vertex, edge_name, transition_name};
pub use layers::model::{RenderLayer, clip_layers};
pub use layers::style::LayerStyle;
pub use pipeline::opts::PipelineOpts;
pub use pipeline::render_data::build_geodata_cache;
pub use pipeline::stages::{CreationMetadata, GraphPipeline, render_test_image};
pub use pipeline::workspace::validate_graph_name;
pub use projection::builder::Projection;
pub use render::cpu::{CpuRasterizer, FrameRGBA};
pub use render::png::{encode_png, write_png};
pub use render::prerender::{Prerendered, prerender};
pub use spatial::bbox::BoundingBox;
pub use spatial::geojson::{Feature, Geometry, GeometryExt, GeometryType, LayerData};
