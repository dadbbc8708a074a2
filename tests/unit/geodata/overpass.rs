use super::*;

#[test]
fn query_carries_the_global_bbox_and_geometry_output() {
    let bbox = BoundingBox::new(47.5, 8.25, 48.0, 9.0);
    let q = build_query("way[highway=motorway];", &bbox);
    assert_eq!(
        q,
        "[out:json][bbox:47.500000,8.250000,48.000000,9.000000];way[highway=motorway];out geom;"
    );
}

#[test]
fn unreachable_endpoint_is_an_external_error() {
    let source = OverpassSource::new("http://127.0.0.1:9/api/interpreter", Duration::from_secs(2)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.geojson");
    let err = source
        .fetch("node;", &BoundingBox::new(0.0, 0.0, 1.0, 1.0), &dest)
        .unwrap_err();
    assert!(matches!(err, GeoflightError::External(_)));
    assert!(!dest.exists());
}
