use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;

use crate::encode::ffmpeg::EncodeJob;
use crate::encode::registry::EncoderRegistry;
use crate::foundation::core::Rect;
use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::frame::frame::Frame;
use crate::frame::sequencer::{EdgePlan, EdgeRecord, ProjectionBatch, sequence_edge, sequence_still};
use crate::geodata::cache::GeodataCache;
use crate::graph::model::Graph;
use crate::layers::catalog::overpass_layer_definitions;
use crate::layers::model::{RenderLayer, clip_layers};
use crate::layers::natural_earth::load_basemap;
use crate::pipeline::opts::PipelineOpts;
use crate::pipeline::render_data::{OsmLayerRecord, background_patches, preload_layers};
use crate::pipeline::workspace::{
    Workspace, copy_dir_all, read_stage_json, validate_graph_name, write_json_atomic,
};
use crate::projection::builder::{DEFAULT_PRECISION, Projection};
use crate::render::cpu::CpuRasterizer;
use crate::render::png::write_png;
use crate::render::prerender::prerender;
use crate::spatial::bbox::BoundingBox;

pub const STAGE_PREGENERATE: &str = "pregenerate";
pub const STAGE_PRELOAD: &str = "preload";
pub const STAGE_RENDER: &str = "render";

/// Resampling tolerance of prerendered paths, in output pixels.
const PRERENDER_TOLERANCE_PX: f64 = 0.5;

/// Margin around the visible canvas, in output pixels, inside which projected
/// paths are still kept.
const CLIP_MARGIN_PX: f64 = 16.0;

/// Options of a run plus where and when it was started, stored as
/// `metadata.json` and embedded in the published `graph.json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationMetadata {
    #[serde(flatten)]
    pub opts: PipelineOpts,
    pub created_at: String,
    pub hostname: String,
    pub user: String,
    /// Total physical memory of the host, bytes.
    pub available_memory: u64,
}

impl CreationMetadata {
    pub fn capture(opts: &PipelineOpts) -> Self {
        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let user = ["USER", "USERNAME"]
            .into_iter()
            .find_map(|key| std::env::var(key).ok())
            .unwrap_or_default();
        Self {
            opts: opts.clone(),
            created_at: chrono::Local::now().to_rfc3339(),
            hostname: sysinfo::System::host_name().unwrap_or_default(),
            user,
            available_memory: sys.total_memory(),
        }
    }
}

/// Staged generation of one named graph.
///
/// Each stage reads what the previous one left in the [`Workspace`], so the
/// stages can run in separate processes. Stages after `pregenerate` use the
/// options recorded in `metadata.json`.
pub struct GraphPipeline {
    name: String,
    graph: Graph,
    workspace: Workspace,
    opts: PipelineOpts,
}

impl GraphPipeline {
    pub fn open(graph_path: &Path, name: &str, opts: PipelineOpts) -> GeoflightResult<Self> {
        validate_graph_name(name)?;
        opts.validate()?;
        let bytes = std::fs::read(graph_path)
            .with_context(|| format!("read graph '{}'", graph_path.display()))?;
        let graph = Graph::from_bytes(&bytes)?;
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S").to_string();
        let workspace = Workspace::locate(&opts.cache_root, &bytes, name, &stamp)?;
        Ok(Self {
            name: name.to_owned(),
            graph,
            workspace,
            opts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn edges(&self) -> GeoflightResult<Vec<EdgeRecord>> {
        read_stage_json(&self.workspace.edges_path(), STAGE_PREGENERATE)
    }

    fn creation_metadata(&self) -> GeoflightResult<CreationMetadata> {
        read_stage_json(&self.workspace.metadata_path(), STAGE_PREGENERATE)
    }

    /// Plan the frames of every edge and record the run options.
    #[tracing::instrument(skip(self), fields(graph = %self.name))]
    pub fn pregenerate(&self) -> GeoflightResult<()> {
        let started = Instant::now();
        let records: Vec<EdgeRecord> = self
            .graph
            .oriented_edges()?
            .into_iter()
            .map(|(from, to)| sequence_edge(from, to, &self.opts.sequencer).to_record())
            .collect();
        write_json_atomic(&self.workspace.edges_path(), &records)?;
        write_json_atomic(
            &self.workspace.metadata_path(),
            &CreationMetadata::capture(&self.opts),
        )?;
        tracing::info!(
            edges = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frame definitions written"
        );
        Ok(())
    }

    /// Fetch the OSM layers of every zoomed-in frame group into the cache.
    #[tracing::instrument(skip(self, cache), fields(graph = %self.name))]
    pub fn preload(&self, cache: &GeodataCache) -> GeoflightResult<()> {
        let started = Instant::now();
        let edges = self.edges()?;
        let per_edge = preload_layers(&edges, &overpass_layer_definitions(), cache)?;
        write_json_atomic(&self.workspace.osm_metadata_path(), &per_edge)?;
        tracing::info!(
            edges = per_edge.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OSM geometries preloaded"
        );
        Ok(())
    }

    /// Parallel batch rendering is on when either the pregenerate run or
    /// this invocation asked for it.
    fn parallel_batches(&self, stored: &PipelineOpts) -> bool {
        stored.parallel_batches || self.opts.parallel_batches
    }

    /// Render edge `index` and start its encoder. Returns `false` once every
    /// edge has been rendered.
    #[tracing::instrument(skip(self), fields(graph = %self.name))]
    pub fn render(&self, index: usize) -> GeoflightResult<bool> {
        let edges = self.edges()?;
        let metadata = self.creation_metadata()?;
        let out_dir = self.workspace.out_dir();
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

        if index == 0 {
            self.write_graph_json(&out_dir, &metadata)?;
        }

        let total = edges.len();
        let Some(record) = edges.into_iter().nth(index) else {
            tracing::info!("all edges rendered");
            return Ok(false);
        };
        let started = Instant::now();
        tracing::info!(edge = index + 1, of = total, "rendering edge");

        let osm: BTreeMap<String, Vec<OsmLayerRecord>> =
            read_stage_json(&self.workspace.osm_metadata_path(), STAGE_PRELOAD)?;
        let opts = &metadata.opts;
        let plan = EdgePlan::from_record(record);
        let edge_id = plan.edge_id();

        let mut layers = load_basemap(opts.natural_earth_dir.as_deref())?;
        for rec in osm.get(&edge_id).map(Vec::as_slice).unwrap_or_default() {
            layers.push(rec.load()?);
        }
        layers.extend(background_patches(
            plan.frames.iter().flatten().flatten().map(|f| &f.descriptor),
        ));

        let frames_dir = self.workspace.frames_dir(&edge_id);
        let bundle_dir = out_dir.join(&edge_id);
        let parallel = self.parallel_batches(opts);
        render_edge(&plan, &layers, &frames_dir, &bundle_dir, parallel)?;
        write_json_atomic(&bundle_dir.join("metadata.json"), &plan.metadata)?;

        let job = EncodeJob {
            edge_id,
            frames_dir,
            forward: out_dir.join(&plan.metadata.forward_file),
            backward: out_dir.join(&plan.metadata.backward_file),
        };
        EncoderRegistry::new(self.workspace.encoders_dir()).spawn(&opts.encoder, &job)?;

        tracing::info!(
            edge = %job.edge_id,
            frames = plan.frame_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "edge rendered"
        );
        Ok(true)
    }

    fn write_graph_json(&self, out_dir: &Path, metadata: &CreationMetadata) -> GeoflightResult<()> {
        let mut graph = serde_json::to_value(&self.graph)
            .map_err(|e| GeoflightError::serde(format!("serialize graph: {e}")))?;
        let meta = serde_json::to_value(metadata)
            .map_err(|e| GeoflightError::serde(format!("serialize creation metadata: {e}")))?;
        if let Some(obj) = graph.as_object_mut() {
            obj.insert("$metadata".to_owned(), meta);
        }
        write_json_atomic(&out_dir.join("graph.json"), &graph)
    }

    /// Wait for every encoder, publish the output tree to
    /// `<out_dir>/<name>`, list the graph in `graphs.json` and delete the
    /// workspace. Returns the published directory.
    #[tracing::instrument(skip(self), fields(graph = %self.name))]
    pub fn commit(&self) -> GeoflightResult<PathBuf> {
        let started = Instant::now();
        let metadata = self.creation_metadata()?;
        let opts = &metadata.opts;
        let out = self.workspace.out_dir();
        if !out.is_dir() {
            return Err(GeoflightError::missing_stage(STAGE_RENDER, out));
        }

        EncoderRegistry::new(self.workspace.encoders_dir())
            .join_all(opts.encoder.join_timeout(), opts.encoder.poll_interval())?;

        let target = publish_dir(&out, &opts.out_dir, &self.name)?;
        if !register_graph(&opts.registry_path(), &self.name)? {
            tracing::warn!("graph already listed in the graph registry");
        }

        std::fs::remove_dir_all(self.workspace.root()).with_context(|| {
            format!("remove working directory '{}'", self.workspace.root().display())
        })?;
        tracing::info!(
            target = %target.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "graph committed"
        );
        Ok(target)
    }
}

/// Render every frame of `plan` as `<frames_dir>/<name>.png`; the first and
/// last frame are also copied to `from.png` and `to.png` in `bundle_dir`.
///
/// Layers are clipped once per bounding box batch and projected once per
/// projection batch.
pub fn render_edge(
    plan: &EdgePlan,
    layers: &[RenderLayer],
    frames_dir: &Path,
    bundle_dir: &Path,
    parallel: bool,
) -> GeoflightResult<()> {
    for dir in [frames_dir, bundle_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("create '{}'", dir.display()))?;
    }
    let total = plan.frame_count();
    let last = total.saturating_sub(1);
    let done = AtomicUsize::new(0);

    for (k, bbox_batch) in plan.frames.iter().enumerate() {
        let boxes: Vec<BoundingBox> = bbox_batch.iter().flatten().map(Frame::bounding_box).collect();
        if boxes.is_empty() {
            continue;
        }
        let bbox = BoundingBox::union(&boxes);
        let clipped = clip_layers(layers, &bbox);
        tracing::debug!(batch = k + 1, %bbox, layers = clipped.len(), "clipped render data");

        let render_batch = |batch: &ProjectionBatch| -> GeoflightResult<()> {
            let Some(first) = batch.first() else {
                return Ok(());
            };
            let pre = prerender(&batch_projection(first, batch), &clipped);
            let mut rasterizer = CpuRasterizer::default();
            for frame in batch {
                let image = rasterizer.rasterize(frame, &pre)?;
                let path = frames_dir.join(format!("{}.png", frame.descriptor.name));
                write_png(&path, &image)?;
                if frame.index() == 0 {
                    copy_file(&path, &bundle_dir.join("from.png"))?;
                }
                if frame.index() == last {
                    copy_file(&path, &bundle_dir.join("to.png"))?;
                }
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                if n % 100 == 0 {
                    tracing::info!(done = n, total, "frames rendered");
                }
            }
            Ok(())
        };

        if parallel {
            bbox_batch.par_iter().try_for_each(render_batch)?;
        } else {
            bbox_batch.iter().try_for_each(render_batch)?;
        }
    }
    Ok(())
}

/// Projection of a batch, resampled finely enough for its largest scale.
/// Projection shared by a projection batch: precision from the largest frame
/// scale, clip extent covering every frame's canvas.
pub(crate) fn batch_projection(first: &Frame, batch: &[Frame]) -> Projection {
    let max_scale = batch.iter().map(Frame::scale).fold(0.0, f64::max);
    let min_scale = batch.iter().map(Frame::scale).fold(f64::INFINITY, f64::min);
    if !(max_scale.is_finite() && min_scale > 0.0) {
        return first.projection.with_precision(DEFAULT_PRECISION);
    }

    let extent = batch
        .iter()
        .flat_map(Frame::corners)
        .map(|p| Rect::from_points(p, p))
        .reduce(|a, b| a.union(b))
        .filter(|r| r.is_finite())
        .map(|r| {
            let margin = CLIP_MARGIN_PX / min_scale;
            r.inflate(margin, margin)
        });
    first
        .projection
        .with_precision(PRERENDER_TOLERANCE_PX / max_scale)
        .with_clip_extent(extent)
}

fn copy_file(from: &Path, to: &Path) -> GeoflightResult<()> {
    std::fs::copy(from, to)
        .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
    Ok(())
}

/// Replace `<out_dir>/<name>` with a copy of `src`.
///
/// The copy is staged next to the target and swapped in by renaming, so a
/// failed copy leaves the previous content in place.
pub fn publish_dir(src: &Path, out_dir: &Path, name: &str) -> GeoflightResult<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create '{}'", out_dir.display()))?;
    let staging = out_dir.join(format!(".{name}.staging"));
    let previous = out_dir.join(format!(".{name}.previous"));
    let target = out_dir.join(name);

    for stale in [&staging, &previous] {
        if stale.exists() {
            std::fs::remove_dir_all(stale)
                .with_context(|| format!("remove '{}'", stale.display()))?;
        }
    }
    copy_dir_all(src, &staging)?;

    if target.exists() {
        std::fs::rename(&target, &previous)
            .with_context(|| format!("move aside '{}'", target.display()))?;
    }
    std::fs::rename(&staging, &target)
        .with_context(|| format!("publish '{}'", target.display()))?;
    if previous.exists() {
        std::fs::remove_dir_all(&previous)
            .with_context(|| format!("remove '{}'", previous.display()))?;
    }
    Ok(target)
}

/// Append `name` to the JSON list at `path`, creating it when missing.
/// Returns `false` when the name was already listed.
pub fn register_graph(path: &Path, name: &str) -> GeoflightResult<bool> {
    let mut names: Vec<String> = if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read '{}'", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| GeoflightError::serde(format!("parse '{}': {e}", path.display())))?
    } else {
        Vec::new()
    };
    if names.iter().any(|n| n == name) {
        return Ok(false);
    }
    names.push(name.to_owned());
    write_json_atomic(path, &names)?;
    Ok(true)
}

/// Render the opening frame of a still flight at `vertex_id` to `out`.
#[tracing::instrument(skip(graph, cache, natural_earth_dir))]
pub fn render_test_image(
    graph: &Graph,
    vertex_id: &str,
    cache: &GeodataCache,
    natural_earth_dir: Option<&Path>,
    out: &Path,
) -> GeoflightResult<()> {
    let vertex = graph.vertex(vertex_id)?;
    let plan = sequence_still(vertex);
    let frame = plan
        .frames
        .iter()
        .flatten()
        .flatten()
        .next()
        .ok_or_else(|| GeoflightError::geometry(format!("no frame planned for vertex '{vertex_id}'")))?;

    let bbox = frame.bounding_box();
    let mut layers = load_basemap(natural_earth_dir)?;
    for definition in overpass_layer_definitions() {
        if frame.zoom < definition.min_zoom() {
            continue;
        }
        let path = cache.load(&definition.overpass_query, &bbox, &definition.layer_name)?;
        let record = OsmLayerRecord {
            definition,
            filename: path,
        };
        layers.push(record.load()?);
    }
    layers.extend(background_patches([&frame.descriptor]));

    let clipped = clip_layers(&layers, &bbox);
    let pre = prerender(&batch_projection(frame, std::slice::from_ref(frame)), &clipped);
    let image = CpuRasterizer::default().rasterize(frame, &pre)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create '{}'", parent.display()))?;
    }
    write_png(out, &image)?;
    tracing::info!(path = %out.display(), zoom = frame.zoom, "test image written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stages.rs"]
mod tests;
