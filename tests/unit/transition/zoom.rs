use super::*;

#[test]
fn endpoints_are_exact() {
    let a = View::new(0.1, -0.2, 0.01);
    let b = View::new(0.4, 0.3, 0.002);
    let z = SmoothZoom::new(a, b);
    assert_eq!(z.at(0.0), a);
    assert_eq!(z.at(1.0), b);
}

#[test]
fn interior_approaches_endpoints_continuously() {
    let a = View::new(0.0, 0.0, 0.01);
    let b = View::new(1.0, 0.0, 0.01);
    let z = SmoothZoom::new(a, b);
    let near_start = z.at(1e-9);
    let near_end = z.at(1.0 - 1e-9);
    assert!((near_start.x - a.x).abs() < 1e-6 && (near_start.w - a.w).abs() < 1e-6);
    assert!((near_end.x - b.x).abs() < 1e-6 && (near_end.w - b.w).abs() < 1e-6);
}

#[test]
fn panning_between_equal_widths_zooms_out_midway() {
    let z = SmoothZoom::new(View::new(0.0, 0.0, 0.01), View::new(1.0, 0.0, 0.01));
    let mid = z.at(0.5);
    assert!((mid.x - 0.5).abs() < 1e-9);
    assert!(mid.w > 0.01);
    assert!(z.duration_ms() > 0.0);
}

#[test]
fn pure_zoom_has_positive_duration_in_both_directions() {
    let a = View::new(0.2, 0.2, 1.0);
    let b = View::new(0.2, 0.2, 0.25);
    let zoom_in = SmoothZoom::new(a, b);
    let zoom_out = SmoothZoom::new(b, a);
    assert!((zoom_in.duration_ms() - zoom_out.duration_ms()).abs() < 1e-9);
    assert!(zoom_in.duration_ms() > 0.0);
    assert!((zoom_in.at(0.5).w - 0.5).abs() < 1e-9);
}
