use super::*;
use serde_json::json;

#[test]
fn missing_attributes_take_canvas_defaults() {
    let s: LayerStyle = serde_json::from_value(json!({"zIndex": 5})).unwrap();
    assert_eq!(s, LayerStyle::new(5));
    assert_eq!(s.stroke_style, Paint::Color(Rgba8::BLACK));
    assert!(s.fill_style.is_none());
    assert_eq!(s.line_width, 1.0);
}

#[test]
fn zoom_window_is_half_open() {
    let s = LayerStyle::new(0).zoom_range(Some(2.0), Some(5.0));
    assert!(!s.is_visible_at(1.99));
    assert!(s.is_visible_at(2.0));
    assert!(s.is_visible_at(4.99));
    assert!(!s.is_visible_at(5.0));
    assert!(LayerStyle::new(0).is_visible_at(-100.0));
}

#[test]
fn null_zoom_bounds_read_as_unbounded() {
    let s: LayerStyle =
        serde_json::from_value(json!({"zIndex": 1, "minZoom": null, "maxZoom": 8})).unwrap();
    assert_eq!(s.min_zoom, None);
    assert!(s.is_visible_at(-1e9));
    assert!(!s.is_visible_at(8.0));
}

#[test]
fn built_in_styles_keep_their_stacking_order() {
    assert!(styles::ocean().z_index < styles::landmass().z_index);
    assert!(styles::lakes().z_index > styles::forests().z_index);
    assert!(styles::horizon().z_index > styles::populated_places().z_index);
    assert!(styles::ocean().stroke_style.is_none());
    assert_eq!(styles::ferry().line_dash, vec![5.0, 2.0]);
}
