//! Frame plans for one graph edge: pre-rotation, pause, pan/zoom, pause,
//! post-rotation, grouped for clipping and for projection reuse.

use crate::foundation::core::{Coordinate, FRAME_RATE, MAX_NATURAL_EARTH_ZOOM, Vec2, canvas_size};
use crate::foundation::math::{great_circle_distance, great_circle_interpolate};
use crate::frame::frame::{Frame, FrameDescriptor};
use crate::graph::model::{Vertex, edge_name, transition_name};
use crate::transition::ease::Ease;
use crate::transition::planner::TransitionPlan;

/// Frames sharing one projection.
pub type ProjectionBatch = Vec<Frame>;
/// Projection batches sharing one clipping bounding box.
pub type BoundingBoxBatch = Vec<ProjectionBatch>;

/// Knobs of the frame sequencer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencerOptions {
    /// Rotation frames for a flight half way around the globe.
    pub frames_for_half_rotation: usize,
    /// Still frames before and after the pan/zoom phase.
    pub frames_pause: usize,
    /// Multiplier on the recommended pan/zoom frame count.
    pub transition_speed: f64,
    pub rotation_ease: Ease,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            frames_for_half_rotation: 120,
            frames_pause: 10,
            transition_speed: 1.0,
            rotation_ease: Ease::InOutCubic,
        }
    }
}

/// Camera metadata of one frame, consumed by the playback client.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetadata {
    pub index: usize,
    pub projection: String,
    pub projection_nodes: [Coordinate; 2],
    pub scale: f64,
    pub translate: [f64; 2],
    pub azimuth: f64,
    pub center: Coordinate,
}

/// Everything the client needs to play one edge in both directions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMetadata {
    pub frames: Vec<FrameMetadata>,
    pub from: Vertex,
    pub to: Vertex,
    pub render_type: String,
    pub forward_file: String,
    pub backward_file: String,
    pub num_frames_rotation: usize,
    pub num_frames_between_phases: usize,
    pub num_frames_main_transition: usize,
    pub num_frames: usize,
}

/// Live frame plan for one edge.
#[derive(Clone, Debug)]
pub struct EdgePlan {
    pub frames: Vec<BoundingBoxBatch>,
    pub metadata: EdgeMetadata,
}

/// Persisted form of an [`EdgePlan`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub edge_id: String,
    pub metadata: EdgeMetadata,
    pub frames: Vec<Vec<Vec<FrameDescriptor>>>,
}

impl EdgePlan {
    pub fn edge_id(&self) -> String {
        edge_name(&self.metadata.from.id, &self.metadata.to.id)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.iter().flatten().map(Vec::len).sum()
    }

    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            edge_id: self.edge_id(),
            metadata: self.metadata.clone(),
            frames: self
                .frames
                .iter()
                .map(|bbox| {
                    bbox.iter()
                        .map(|batch| batch.iter().map(|f| f.descriptor.clone()).collect())
                        .collect()
                })
                .collect(),
        }
    }

    pub fn from_record(record: EdgeRecord) -> Self {
        let frames = record
            .frames
            .into_iter()
            .map(|bbox| {
                bbox.into_iter()
                    .map(|batch| batch.into_iter().map(Frame::from_descriptor).collect())
                    .collect()
            })
            .collect();
        Self {
            frames,
            metadata: record.metadata,
        }
    }
}

/// Number of frames for each phase of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseCounts {
    pub rotation: usize,
    pub pause: usize,
    pub main: usize,
}

impl PhaseCounts {
    pub fn compute(from: &Vertex, to: &Vertex, duration_ms: f64, opts: &SequencerOptions) -> Self {
        let relative = great_circle_distance(from.coords, to.coords) / std::f64::consts::PI;
        let rotation = ((relative * opts.frames_for_half_rotation as f64).round() as usize).max(2);
        let main_frames =
            (f64::from(FRAME_RATE) * duration_ms / 1000.0 * opts.transition_speed).ceil();
        let main = if main_frames.is_finite() && main_frames > 2.0 {
            main_frames as usize
        } else {
            2
        };
        Self {
            rotation,
            pause: opts.frames_pause,
            main,
        }
    }

    pub fn total(&self) -> usize {
        2 * self.rotation + 2 * self.pause + self.main
    }
}

fn metadata(
    index: usize,
    foci: [Coordinate; 2],
    scale: f64,
    translate: Vec2,
    azimuth: f64,
    center: Coordinate,
) -> FrameMetadata {
    FrameMetadata {
        index,
        projection: "tpeqd".to_owned(),
        projection_nodes: foci,
        scale,
        translate: [translate.x, translate.y],
        azimuth,
        center,
    }
}

/// Stand-in vertex used to plan towards an intermediate rotation target.
fn waypoint(coords: Coordinate, zoom: f64) -> Vertex {
    Vertex {
        id: String::new(),
        label: String::new(),
        coords,
        zoom,
    }
}

/// Build the frame plan and client metadata for the flight `from -> to`.
#[tracing::instrument(skip_all, fields(from = %from.id, to = %to.id))]
pub fn sequence_edge(from: &Vertex, to: &Vertex, opts: &SequencerOptions) -> EdgePlan {
    let (p1, p2) = (from.coords, to.coords);
    let main_plan = TransitionPlan::between(from, to);
    let proj = main_plan.projection().clone();
    let counts = PhaseCounts::compute(from, to, main_plan.duration_ms(), opts);
    let PhaseCounts {
        rotation: r,
        pause: p,
        main: m,
    } = counts;
    tracing::info!(
        frames = m,
        duration_ms = main_plan.duration_ms().round(),
        "pan/zoom frames for {} -> {}",
        from.label,
        to.label
    );

    let mut frame_metadata = Vec::with_capacity(counts.total());
    let mut transition_frames: Vec<Frame> = Vec::new();
    let ease_at = |n: usize| opts.rotation_ease.apply(n as f64 / (r - 1) as f64);

    // Pre-rotation: turn the globe from north-up at the origin towards the destination.
    let origin_plan = TransitionPlan::between(from, from);
    let mut pre_rotation_first = Vec::new();
    for n in 0..r {
        let intermediate = great_circle_interpolate(p1, p2, ease_at(n));
        let target = TransitionPlan::between(from, &waypoint(intermediate, to.zoom));
        let first_half = 2 * n < r;
        let (actual, foci) = if first_half {
            (&origin_plan, [p1, p1])
        } else {
            (&main_plan, [p1, p2])
        };

        let target_azimuth = target.projection().azimuth(p1);
        let post_rotation = target_azimuth - actual.projection().azimuth(p1);

        let shown = target.at(0.0);
        frame_metadata.push(metadata(
            n,
            [p1, intermediate],
            shown.scale,
            shown.translate,
            target_azimuth,
            p1,
        ));

        let state = actual.at(0.0);
        let frame = Frame::new(
            actual.projection().clone(),
            foci,
            state.scale,
            state.translate,
            &from.id,
            n,
            post_rotation,
        );
        if first_half {
            pre_rotation_first.push(frame);
        } else {
            transition_frames.push(frame);
        }
    }

    // Main pan/zoom.
    for n in 0..m {
        let t = n as f64 / (m - 1) as f64;
        let state = main_plan.at(t);
        let index = n + p + r;
        let center = proj
            .center(state.scale, state.translate, canvas_size())
            .unwrap_or_else(|| {
                tracing::warn!(index, "frame centre does not invert, using [0, 0]");
                Coordinate::new(0.0, 0.0)
            });
        frame_metadata.push(metadata(
            index,
            [p1, p2],
            state.scale,
            state.translate,
            proj.azimuth(center),
            center,
        ));
        let key = if 2 * n <= m { &from.id } else { &to.id };
        transition_frames.push(Frame::new(
            proj.clone(),
            [p1, p2],
            state.scale,
            state.translate,
            key,
            index,
            0.0,
        ));
    }

    // Pauses at both ends of the pan/zoom.
    for (offset, t, anchor, key) in [(r, 0.0, p1, &from.id), (r + p + m, 1.0, p2, &to.id)] {
        let state = main_plan.at(t);
        let template = Frame::new(proj.clone(), [p1, p2], state.scale, state.translate, key, offset, 0.0);
        for n in 0..p {
            let index = offset + n;
            frame_metadata.push(metadata(
                index,
                [p1, p2],
                state.scale,
                state.translate,
                proj.azimuth(anchor),
                anchor,
            ));
            transition_frames.push(reindexed(&template, index));
        }
    }

    // Post-rotation: mirror of the pre-rotation around the destination.
    let destination_plan = TransitionPlan::between(to, to);
    let mut post_rotation_second = Vec::new();
    for n in 0..r {
        let intermediate = great_circle_interpolate(p1, p2, ease_at(n));
        let target = TransitionPlan::between(to, &waypoint(intermediate, to.zoom));
        let first_half = 2 * n < r;
        let (actual, foci) = if first_half {
            (&main_plan, [p1, p2])
        } else {
            (&destination_plan, [p2, p2])
        };

        let target_azimuth = target.projection().azimuth(p2);
        let post_rotation = target_azimuth - actual.projection().azimuth(p2);
        let index = n + 2 * p + r + m;

        let shown = target.at(0.0);
        frame_metadata.push(metadata(
            index,
            [p2, intermediate],
            shown.scale,
            shown.translate,
            target_azimuth,
            p2,
        ));

        let state = actual.at(1.0);
        let frame = Frame::new(
            actual.projection().clone(),
            foci,
            state.scale,
            state.translate,
            &to.id,
            index,
            post_rotation,
        );
        if first_half {
            transition_frames.push(frame);
        } else {
            post_rotation_second.push(frame);
        }
    }

    transition_frames.sort_by_key(Frame::index);
    frame_metadata.sort_by_key(|f| f.index);

    let mut frames: Vec<BoundingBoxBatch> = vec![vec![pre_rotation_first]];
    frames.extend(
        split_by_natural_earth_zoom(transition_frames)
            .into_iter()
            .map(|run| vec![run]),
    );
    frames.push(vec![post_rotation_second]);
    frames.retain(|bbox| bbox.iter().any(|batch| !batch.is_empty()));

    let metadata = EdgeMetadata {
        frames: frame_metadata,
        from: from.clone(),
        to: to.clone(),
        render_type: "png".to_owned(),
        forward_file: transition_name(&from.id, &to.id),
        backward_file: transition_name(&to.id, &from.id),
        num_frames_rotation: r,
        num_frames_between_phases: p,
        num_frames_main_transition: m,
        num_frames: counts.total(),
    };
    EdgePlan { frames, metadata }
}

fn reindexed(template: &Frame, index: usize) -> Frame {
    let mut f = template.clone();
    f.descriptor.index = index;
    f.descriptor.name = crate::frame::frame::frame_name(index);
    f
}

/// Split index-sorted frames into a leading run above the Natural Earth zoom
/// threshold, the following run at or below it, and the remainder.
fn split_by_natural_earth_zoom(mut frames: Vec<Frame>) -> [Vec<Frame>; 3] {
    let first = frames
        .iter()
        .position(|f| f.zoom <= MAX_NATURAL_EARTH_ZOOM)
        .unwrap_or(frames.len());
    let mut rest = frames.split_off(first);
    let second = rest
        .iter()
        .position(|f| f.zoom > MAX_NATURAL_EARTH_ZOOM)
        .unwrap_or(rest.len());
    let tail = rest.split_off(second);
    [frames, rest, tail]
}

/// Plan for a single vertex, used to render test stills. Its first frame
/// shows the vertex north-up at its preferred zoom.
pub fn sequence_still(vertex: &Vertex) -> EdgePlan {
    let opts = SequencerOptions {
        frames_for_half_rotation: 20,
        frames_pause: 1,
        ..SequencerOptions::default()
    };
    sequence_edge(vertex, vertex, &opts)
}

#[cfg(test)]
#[path = "../../tests/unit/frame/sequencer.rs"]
mod tests;
