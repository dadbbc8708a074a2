use super::*;
use crate::foundation::core::Coordinate;
use crate::layers::model::RenderLayer;
use crate::layers::style::LayerStyle;
use crate::projection::builder::Projection;
use crate::render::prerender::prerender;
use crate::spatial::geojson::{Feature, Geometry, LayerData};

const CENTRE: usize = (512 * 1024 + 512) * 4;

fn frame(scale: f64) -> Frame {
    let foci = [Coordinate::new(-10.0, 0.0), Coordinate::new(10.0, 0.0)];
    let projection = Projection::two_point_equidistant(foci);
    let t = projection.project(Coordinate::new(0.0, 0.0)).unwrap().to_vec2();
    Frame::new(projection, foci, scale, t, "a", 0, 0.0)
}

fn filled_sphere(z: i32, color: Rgba8) -> RenderLayer {
    RenderLayer::new(
        LayerStyle::new(z).stroke(Paint::None).fill(Paint::Color(color)),
        LayerData::Sphere,
    )
}

fn centre_pixel(img: &FrameRGBA) -> [u8; 4] {
    let px = &img.data[CENTRE..CENTRE + 4];
    [px[0], px[1], px[2], px[3]]
}

#[test]
fn empty_frame_is_white() {
    let f = frame(200.0);
    let img = CpuRasterizer::default()
        .rasterize(&f, &Prerendered::default())
        .unwrap();
    assert_eq!((img.width, img.height), (1024, 1024));
    assert!(img.data.iter().all(|&b| b == 255));
}

#[test]
fn filled_sphere_covers_the_centre() {
    let f = frame(200.0);
    let pre = prerender(&f.projection, &[filled_sphere(0, Rgba8::rgb(176, 224, 230))]);
    let img = CpuRasterizer::default().rasterize(&f, &pre).unwrap();
    assert_eq!(centre_pixel(&img), [176, 224, 230, 255]);
    assert_eq!(&img.data[0..4], &[255, 255, 255, 255]);
}

#[test]
fn higher_z_index_is_drawn_last() {
    let f = frame(200.0);
    let layers = [
        filled_sphere(5, Rgba8::rgb(255, 0, 0)),
        filled_sphere(1, Rgba8::rgb(0, 0, 255)),
    ];
    let img = CpuRasterizer::default()
        .rasterize(&f, &prerender(&f.projection, &layers))
        .unwrap();
    assert_eq!(centre_pixel(&img), [255, 0, 0, 255]);
}

#[test]
fn layers_outside_their_zoom_window_are_skipped() {
    let f = frame(200.0);
    let hidden = RenderLayer::new(
        LayerStyle::new(0)
            .fill(Paint::Color(Rgba8::BLACK))
            .zoom_range(Some(f.zoom + 1.0), None),
        LayerData::Sphere,
    );
    let img = CpuRasterizer::default()
        .rasterize(&f, &prerender(&f.projection, &[hidden]))
        .unwrap();
    assert_eq!(centre_pixel(&img), [255, 255, 255, 255]);
}

#[test]
fn point_symbols_are_drawn_at_the_frame_scale() {
    let f = frame(5000.0);
    let point = RenderLayer::new(
        LayerStyle::new(50).stroke(Paint::None).fill(Paint::Color(Rgba8::rgb(255, 0, 0))),
        LayerData::Feature(Feature::new(Geometry::Point(Coordinate::new(0.0, 0.0).into()))),
    );
    let img = CpuRasterizer::default()
        .rasterize(&f, &prerender(&f.projection, &[point]))
        .unwrap();
    assert_eq!(centre_pixel(&img), [255, 0, 0, 255]);
    // 20 px away is well outside the 4.5 px symbol
    let off = ((512 + 20) * 1024 + 512) * 4;
    assert_eq!(&img.data[off..off + 4], &[255, 255, 255, 255]);
}

#[test]
fn point_layers_outside_their_zoom_window_are_skipped() {
    let f = frame(5000.0);
    let point = RenderLayer::new(
        LayerStyle::new(50)
            .stroke(Paint::None)
            .fill(Paint::Color(Rgba8::rgb(255, 0, 0)))
            .zoom_range(None, Some(f.zoom - 1.0)),
        LayerData::Feature(Feature::new(Geometry::Point(Coordinate::new(0.0, 0.0).into()))),
    );
    let img = CpuRasterizer::default()
        .rasterize(&f, &prerender(&f.projection, &[point]))
        .unwrap();
    assert_eq!(centre_pixel(&img), [255, 255, 255, 255]);
}

#[test]
fn identical_inputs_rasterize_identically() {
    let f = frame(300.0);
    let line = RenderLayer::new(
        LayerStyle::new(2).line_width(2.0).dash(&[4.0, 2.0]),
        LayerData::Feature(Feature::new(geo::LineString::from(vec![(-1.0, -1.0), (1.0, 1.0)]))),
    );
    let pre = prerender(&f.projection, &[filled_sphere(0, Rgba8::rgb(1, 2, 3)), line]);
    let mut r = CpuRasterizer::default();
    let a = r.rasterize(&f, &pre).unwrap();
    let b = r.rasterize(&f, &pre).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn invalid_scale_is_rejected() {
    let mut f = frame(200.0);
    f.descriptor.scale = 0.0;
    assert!(CpuRasterizer::default().rasterize(&f, &Prerendered::default()).is_err());
}
