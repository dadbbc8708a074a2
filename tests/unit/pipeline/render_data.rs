use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::foundation::core::{Coordinate, zoom_to_scale};
use crate::foundation::error::GeoflightError;
use crate::frame::sequencer::{SequencerOptions, sequence_edge};
use crate::geodata::source::GeodataSource;
use crate::graph::model::Vertex;
use crate::layers::style::LayerStyle;
use crate::spatial::geojson::GeometryType;

fn descriptor(key: &str, zoom: f64, bbox: BoundingBox) -> FrameDescriptor {
    FrameDescriptor {
        bounding_box: bbox,
        foci: [Coordinate::new(0.0, 0.0), Coordinate::new(20.0, 0.0)],
        scale: zoom_to_scale(zoom),
        translate: [0.0, 0.0],
        key: key.to_owned(),
        index: 0,
        name: "0000".to_owned(),
        post_rotation: 0.0,
    }
}

struct CountingSource(Arc<AtomicUsize>);

impl GeodataSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn fetch(&self, _query: &str, _bbox: &BoundingBox, dest: &Path) -> crate::foundation::error::GeoflightResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        std::fs::write(dest, r#"{"type":"FeatureCollection","features":[]}"#)?;
        Ok(())
    }
}

fn vertex(id: &str, lon: f64, lat: f64, zoom: f64) -> Vertex {
    Vertex {
        id: id.to_owned(),
        label: id.to_owned(),
        coords: Coordinate::new(lon, lat),
        zoom,
    }
}

fn definition(min_zoom: f64) -> OverpassLayerDefinition {
    OverpassLayerDefinition {
        layer_name: "test roads".to_owned(),
        style: LayerStyle::new(20).zoom_range(Some(min_zoom), None),
        overpass_query: "way[highway];".to_owned(),
        valid_geometries: vec![GeometryType::LineString],
    }
}

#[test]
fn boxes_are_united_per_key_in_first_seen_order() {
    let frames = [
        descriptor("b", 3.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        descriptor("a", 3.0, BoundingBox::new(5.0, 5.0, 6.0, 6.0)),
        descriptor("b", 3.0, BoundingBox::new(-1.0, 0.5, 0.5, 2.0)),
    ];
    let groups = union_by_key(&frames);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, "b");
    assert_eq!(groups[0].1, BoundingBox::new(-1.0, 0.0, 1.0, 2.0));
    assert_eq!(groups[1].0, "a");
}

#[test]
fn patches_only_cover_zoomed_in_frames() {
    let low = [descriptor("a", 3.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0))];
    assert!(background_patches(&low).is_empty());

    let high = [
        descriptor("a", 3.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        descriptor("a", 10.0, BoundingBox::new(0.0, 0.0, 0.1, 0.1)),
        descriptor("b", 11.0, BoundingBox::new(3.0, 3.0, 3.1, 3.1)),
    ];
    let patches = background_patches(&high);
    assert_eq!(patches.len(), 4);
    assert_eq!(patches[0].style, styles::ocean());
    assert_eq!(patches[1].style.min_zoom, Some(MAX_NATURAL_EARTH_ZOOM));
    assert!(!patches[1].style.is_visible_at(5.0));
    assert!(patches[1].style.is_visible_at(10.0));
}

#[test]
fn preload_fetches_once_per_key_and_lists_layers_per_edge() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = GeodataCache::new(dir.path(), Box::new(CountingSource(calls.clone())));

    let a = vertex("A", 0.0, 0.0, 12.0);
    let b = vertex("B", 1.0, 1.0, 12.0);
    let record = sequence_edge(&a, &b, &SequencerOptions::default()).to_record();
    let edges = vec![record];

    let per_edge = preload_layers(&edges, &[definition(10.0), definition(30.0)], &cache).unwrap();
    let records = &per_edge["A__B"];
    assert_eq!(records.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    for r in records {
        assert!(r.filename.is_file());
        let layer = r.load().unwrap();
        assert_eq!(layer.style.z_index, 20);
    }

    let again = preload_layers(&edges, &[definition(10.0)], &cache).unwrap();
    assert_eq!(again, per_edge);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn preload_without_water_source_fails_for_file_layers() {
    let dir = tempfile::tempdir().unwrap();
    let cache = GeodataCache::new(dir.path(), Box::new(CountingSource(Arc::default())));
    let a = vertex("A", 0.0, 0.0, 12.0);
    let edges = vec![sequence_edge(&a, &a, &SequencerOptions::default()).to_record()];
    let water = OverpassLayerDefinition {
        overpass_query: crate::layers::catalog::OCEANS_FROM_FILE.to_owned(),
        ..definition(10.0)
    };
    assert!(matches!(
        preload_layers(&edges, &[water], &cache),
        Err(GeoflightError::Validation(_))
    ));
}

#[test]
fn layer_records_keep_the_definition_flat_next_to_the_file_name() {
    let record = OsmLayerRecord {
        definition: definition(10.0),
        filename: "cache/x.geojson".into(),
    };
    let v = serde_json::to_value(&record).unwrap();
    assert_eq!(v["layerName"], "test roads");
    assert_eq!(v["minZoom"], 10.0);
    assert_eq!(v["filename"], "cache/x.geojson");
    let back: OsmLayerRecord = serde_json::from_value(v).unwrap();
    assert_eq!(back, record);
}
