use super::*;

#[test]
fn union_of_single_box_is_identity() {
    let b = BoundingBox::new(-10.0, 20.0, 15.5, 42.0);
    assert_eq!(BoundingBox::union([&b]), b);
}

#[test]
fn union_is_commutative_and_associative() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(-5.0, 3.0, 4.0, 30.0);
    let c = BoundingBox::new(8.0, -40.0, 60.0, -20.0);

    assert_eq!(BoundingBox::union([&a, &b]), BoundingBox::union([&b, &a]));

    let ab_c = BoundingBox::union([&BoundingBox::union([&a, &b]), &c]);
    let a_bc = BoundingBox::union([&a, &BoundingBox::union([&b, &c])]);
    assert_eq!(ab_c, a_bc);
    assert_eq!(ab_c, BoundingBox::new(-5.0, -40.0, 60.0, 30.0));
}

#[test]
fn union_of_nothing_is_zero_box() {
    let empty: [&BoundingBox; 0] = [];
    assert_eq!(BoundingBox::union(empty), BoundingBox::new(0.0, 0.0, 0.0, 0.0));
}

#[test]
fn serializes_as_south_west_north_east_tuple() {
    let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(serde_json::to_string(&b).unwrap(), "[1.0,2.0,3.0,4.0]");
    let back: BoundingBox = serde_json::from_str("[1,2,3,4]").unwrap();
    assert_eq!(back, b);
}

#[test]
fn string_forms_use_ascii_minus_and_six_decimals() {
    let b = BoundingBox::new(-1.5, -2.25, 3.0, 4.125);
    assert_eq!(b.to_overpass_string(), "-1.500000,-2.250000,3.000000,4.125000");
    assert_eq!(
        b.to_ogr_args(),
        [
            "-2.250000".to_string(),
            "-1.500000".to_string(),
            "4.125000".to_string(),
            "3.000000".to_string()
        ]
    );
}

#[test]
fn polygon_is_closed_and_contains_corners() {
    let b = BoundingBox::new(0.0, 0.0, 1.0, 2.0);
    let polygon = b.to_polygon();
    let ring = &polygon.exterior().0;
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert!(ring.iter().all(|&c| b.contains(c.into())));
    assert_eq!(BoundingBox::from(b.to_rect()), b);
}

#[test]
fn from_coordinates_tracks_extrema() {
    let b = BoundingBox::from_coordinates([
        Coordinate::new(5.0, 1.0),
        Coordinate::new(-3.0, 7.0),
        Coordinate::new(2.0, -4.0),
    ])
    .unwrap();
    assert_eq!(b, BoundingBox::new(-4.0, -3.0, 7.0, 5.0));
    assert!(BoundingBox::from_coordinates([]).is_none());
}
