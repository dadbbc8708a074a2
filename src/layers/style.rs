use crate::layers::paint::{Paint, Rgba8};

/// Drawing attributes and zoom window of a render layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub z_index: i32,
    #[serde(default = "default_stroke")]
    pub stroke_style: Paint,
    #[serde(default = "default_fill")]
    pub fill_style: Paint,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub line_dash: Vec<f64>,
    /// Inclusive lower zoom bound; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    /// Exclusive upper zoom bound; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

fn default_stroke() -> Paint {
    Paint::Color(Rgba8::BLACK)
}

fn default_fill() -> Paint {
    Paint::None
}

fn default_line_width() -> f64 {
    1.0
}

impl LayerStyle {
    /// Black 1px stroke, no fill, drawn at `z_index`.
    pub fn new(z_index: i32) -> Self {
        Self {
            z_index,
            stroke_style: default_stroke(),
            fill_style: default_fill(),
            line_width: default_line_width(),
            line_dash: Vec::new(),
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn stroke(mut self, paint: Paint) -> Self {
        self.stroke_style = paint;
        self
    }

    pub fn fill(mut self, paint: Paint) -> Self {
        self.fill_style = paint;
        self
    }

    pub fn line_width(mut self, w: f64) -> Self {
        self.line_width = w;
        self
    }

    pub fn dash(mut self, dash: &[f64]) -> Self {
        self.line_dash = dash.to_vec();
        self
    }

    pub fn zoom_range(mut self, min_zoom: Option<f64>, max_zoom: Option<f64>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// `min_zoom <= zoom < max_zoom`, missing bounds being unbounded.
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        self.min_zoom.is_none_or(|min| min <= zoom) && self.max_zoom.is_none_or(|max| zoom < max)
    }
}

/// Built-in map styles.
pub mod styles {
    use super::LayerStyle;
    use crate::layers::paint::{Paint, Rgba8};

    const WATER: Paint = Paint::Color(Rgba8::rgb(176, 224, 230));
    const NO_PAINT: Paint = Paint::None;
    const BORDER: Paint = Paint::Color(Rgba8::rgba(148, 37, 188, 77));

    const fn hex(r: u8, g: u8, b: u8) -> Paint {
        Paint::Color(Rgba8::rgb(r, g, b))
    }

    pub fn ocean() -> LayerStyle {
        LayerStyle::new(0).stroke(NO_PAINT).fill(WATER).line_width(0.0)
    }

    pub fn horizon() -> LayerStyle {
        LayerStyle::new(100).line_width(2.0)
    }

    pub fn landmass() -> LayerStyle {
        LayerStyle::new(1)
            .stroke(hex(0x55, 0x55, 0x55))
            .fill(Paint::Color(Rgba8::rgb(144, 238, 144)))
    }

    pub fn osm_landmass() -> LayerStyle {
        LayerStyle::new(1)
            .stroke(hex(0x55, 0x55, 0x55))
            .fill(hex(0xf4, 0xf3, 0xde))
    }

    pub fn glaciated_areas() -> LayerStyle {
        LayerStyle::new(2)
            .stroke(hex(0x0b, 0x72, 0x8a))
            .fill(hex(0xcf, 0xe8, 0xef))
    }

    pub fn antarctic_ice_shelves() -> LayerStyle {
        LayerStyle::new(3)
            .stroke(hex(0x51, 0x86, 0x93))
            .fill(hex(0xdf, 0xec, 0xef))
    }

    pub fn reefs() -> LayerStyle {
        LayerStyle::new(6).stroke(hex(0x33, 0x40, 0x70))
    }

    pub fn forests() -> LayerStyle {
        LayerStyle::new(17).stroke(NO_PAINT).fill(hex(0x87, 0xc1, 0x7a))
    }

    pub fn rivers() -> LayerStyle {
        LayerStyle::new(18).stroke(NO_PAINT)
    }

    pub fn lakes() -> LayerStyle {
        LayerStyle::new(19).stroke(NO_PAINT).fill(WATER)
    }

    pub fn urban_areas() -> LayerStyle {
        LayerStyle::new(11).stroke(NO_PAINT).fill(hex(0xd1, 0xca, 0xba))
    }

    pub fn agricultural() -> LayerStyle {
        LayerStyle::new(10).stroke(NO_PAINT).fill(hex(0xc7, 0xd1, 0x75))
    }

    pub fn park() -> LayerStyle {
        LayerStyle::new(11).stroke(NO_PAINT).fill(hex(0xd3, 0xf4, 0xa1))
    }

    /// Military areas, airports and similar.
    pub fn special_urban_areas() -> LayerStyle {
        LayerStyle::new(12)
            .stroke(hex(0xb2, 0x4b, 0x13))
            .fill(Paint::Color(Rgba8::rgba(224, 93, 22, 77)))
    }

    pub fn buildings() -> LayerStyle {
        LayerStyle::new(28).stroke(NO_PAINT).fill(hex(0x7c, 0x7c, 0x7c))
    }

    pub fn national_parks() -> LayerStyle {
        LayerStyle::new(19)
            .stroke(hex(0x06, 0x2a, 0x03))
            .fill(Paint::Color(Rgba8::rgba(151, 252, 136, 38)))
    }

    pub fn main_road() -> LayerStyle {
        LayerStyle::new(23).stroke(hex(0xdd, 0x99, 0x22))
    }

    pub fn motorway_road() -> LayerStyle {
        LayerStyle::new(25).stroke(hex(0xb2, 0x30, 0x13)).line_width(3.0)
    }

    pub fn major_road() -> LayerStyle {
        LayerStyle::new(24).stroke(hex(0xd8, 0x6e, 0x27)).line_width(2.0)
    }

    pub fn residential_road() -> LayerStyle {
        LayerStyle::new(22).stroke(hex(0xb7, 0xa8, 0x47))
    }

    pub fn track_road() -> LayerStyle {
        LayerStyle::new(21).stroke(hex(0x44, 0x44, 0x1f))
    }

    pub fn path_road() -> LayerStyle {
        LayerStyle::new(20).stroke(hex(0x66, 0x66, 0x66)).dash(&[1.0, 1.0])
    }

    pub fn ferry() -> LayerStyle {
        LayerStyle::new(22).stroke(hex(0x34, 0x39, 0x7c)).dash(&[5.0, 2.0])
    }

    pub fn railroads() -> LayerStyle {
        LayerStyle::new(22).stroke(hex(0x44, 0x44, 0x55))
    }

    pub fn admin0_border() -> LayerStyle {
        LayerStyle::new(30).stroke(BORDER).line_width(3.0)
    }

    pub fn admin0_contested_border() -> LayerStyle {
        LayerStyle::new(30)
            .stroke(Paint::Color(Rgba8::rgba(188, 37, 148, 77)))
            .line_width(2.0)
            .dash(&[3.0, 1.0])
    }

    pub fn admin1_border() -> LayerStyle {
        LayerStyle::new(30).stroke(BORDER).line_width(2.0).dash(&[2.0, 2.0])
    }

    pub fn admin2_border() -> LayerStyle {
        LayerStyle::new(30)
            .stroke(BORDER)
            .line_width(2.0)
            .dash(&[3.0, 2.0, 1.0, 2.0, 1.0, 2.0])
    }

    pub fn populated_places() -> LayerStyle {
        LayerStyle::new(40).fill(hex(0xaa, 0x6e, 0x1b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/style.rs"]
mod tests;
