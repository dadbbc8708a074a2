use super::*;

fn vertex(id: &str, lon: f64, lat: f64, zoom: f64) -> Vertex {
    Vertex {
        id: id.to_owned(),
        label: id.to_owned(),
        coords: Coordinate::new(lon, lat),
        zoom,
    }
}

fn all_frames(plan: &EdgePlan) -> Vec<&Frame> {
    plan.frames.iter().flatten().flatten().collect()
}

#[test]
fn phase_counts_follow_distance_and_duration() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let opts = SequencerOptions::default();
    let plan = sequence_edge(&a, &b, &opts);
    let md = &plan.metadata;

    let relative = great_circle_distance(a.coords, b.coords) / std::f64::consts::PI;
    let expected_rotation = ((relative * 120.0).round() as usize).max(2);
    assert_eq!(md.num_frames_rotation, expected_rotation);
    assert_eq!(md.num_frames_between_phases, 10);
    assert!(md.num_frames_main_transition >= 2);
    assert_eq!(
        md.num_frames,
        2 * md.num_frames_rotation + 2 * md.num_frames_between_phases + md.num_frames_main_transition
    );
    assert_eq!(plan.frame_count(), md.num_frames);
}

#[test]
fn indices_are_contiguous_and_metadata_sorted() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());

    let mut indices: Vec<usize> = all_frames(&plan).iter().map(|f| f.index()).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..plan.metadata.num_frames).collect::<Vec<_>>());

    let md_indices: Vec<usize> = plan.metadata.frames.iter().map(|f| f.index).collect();
    assert_eq!(md_indices, (0..plan.metadata.num_frames).collect::<Vec<_>>());
    assert!(all_frames(&plan).iter().all(|f| f.descriptor.name == format!("{:04}", f.index())));
}

#[test]
fn projection_batches_share_foci() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());
    for batch in plan.frames.iter().flatten() {
        let foci = batch[0].descriptor.foci;
        assert!(batch.iter().all(|f| f.descriptor.foci == foci));
    }

    let first = &plan.frames[0][0];
    assert!(first.iter().all(|f| f.descriptor.foci == [a.coords, a.coords] && f.key() == "A"));
    let last = &plan.frames[plan.frames.len() - 1][0];
    assert!(last.iter().all(|f| f.descriptor.foci == [b.coords, b.coords] && f.key() == "B"));
}

#[test]
fn low_zoom_edges_have_a_single_transition_group() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());
    assert_eq!(plan.frames.len(), 3);
    assert!(plan.frames[1][0].iter().all(|f| f.zoom <= MAX_NATURAL_EARTH_ZOOM));
}

#[test]
fn high_zoom_edges_split_around_the_natural_earth_run() {
    let a = vertex("A", 0.0, 0.0, 12.0);
    let b = vertex("B", 10.0, 10.0, 12.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());
    assert_eq!(plan.frames.len(), 5);
    assert!(plan.frames[1][0].iter().all(|f| f.zoom > MAX_NATURAL_EARTH_ZOOM));
    assert!(plan.frames[2][0].iter().all(|f| f.zoom <= MAX_NATURAL_EARTH_ZOOM));
}

#[test]
fn main_transition_hands_the_key_over_midway() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());
    let md = &plan.metadata;
    let start = md.num_frames_rotation + md.num_frames_between_phases;
    let m = md.num_frames_main_transition;
    for f in all_frames(&plan) {
        let i = f.index();
        if (start..start + m).contains(&i) {
            let n = i - start;
            let expected = if 2 * n <= m { "A" } else { "B" };
            assert_eq!(f.key(), expected, "frame {i}");
        }
    }
}

#[test]
fn record_roundtrip_keeps_the_plan() {
    let a = vertex("A", 0.0, 0.0, 4.0);
    let b = vertex("B", 10.0, 10.0, 4.0);
    let plan = sequence_edge(&a, &b, &SequencerOptions::default());
    let json = serde_json::to_string(&plan.to_record()).unwrap();
    let record: EdgeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record.edge_id, "A__B");
    assert_eq!(record.metadata.forward_file, "transition_A-B.webm");
    assert_eq!(record.metadata.backward_file, "transition_B-A.webm");

    let back = EdgePlan::from_record(record);
    assert_eq!(back.frame_count(), plan.frame_count());
    assert_eq!(back.frames.len(), plan.frames.len());
    assert_eq!(back.frames[0][0][0].key(), "A");
}

#[test]
fn still_plan_starts_north_up_at_the_vertex() {
    let v = vertex("V", 13.4, 52.5, 10.0);
    let plan = sequence_still(&v);
    let first = all_frames(&plan)[0];
    assert_eq!(first.index(), 0);
    assert_eq!(first.descriptor.post_rotation, 0.0);
    assert!(first.bounding_box().contains(v.coords));
}
