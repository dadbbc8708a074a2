use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

/// Fill or stroke paint of a layer: a CSS color or `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    None,
    Color(Rgba8),
}

impl Paint {
    pub fn color(self) -> Option<Rgba8> {
        match self {
            Self::None => None,
            Self::Color(c) => Some(c),
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Parse a CSS color: `none`, `#rgb`, `#rrggbb`, `#rrggbbaa` (the `#` may be
    /// omitted), `rgb(...)`, `rgba(...)` or a named color.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower == "none" || lower == "transparent" {
            return Ok(Self::None);
        }
        if let Some(c) = named(&lower) {
            return Ok(Self::Color(c));
        }
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_rgb_function(args).map(Self::Color);
        }
        parse_hex(&lower).map(Self::Color)
    }

    /// CSS serialization that [`Paint::parse`] reads back.
    pub fn to_css(self) -> String {
        match self {
            Self::None => "none".to_owned(),
            Self::Color(Rgba8 { r, g, b, a: 255 }) => format!("#{r:02x}{g:02x}{b:02x}"),
            Self::Color(Rgba8 { r, g, b, a }) => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
        }
    }
}

impl Serialize for Paint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Paint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn named(name: &str) -> Option<Rgba8> {
    Some(match name {
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "blue" => Rgba8::rgb(0, 0, 255),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "powderblue" => Rgba8::rgb(176, 224, 230),
        "lightgreen" => Rgba8::rgb(144, 238, 144),
        "lightblue" => Rgba8::rgb(173, 216, 230),
        _ => return None,
    })
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !s.is_ascii() {
        return Err(format!("invalid color \"{s}\""));
    }
    match s.len() {
        3 => Ok(Rgba8::rgb(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err(format!(
            "color \"{s}\" must be a name, rgb()/rgba() or #RGB, #RRGGBB, #RRGGBBAA"
        )),
    }
}

fn parse_rgb_function(args: &str) -> Result<Rgba8, String> {
    let inner = args
        .strip_suffix(')')
        .ok_or_else(|| format!("unterminated color function \"{args}\""))?;
    let parts: Vec<f64> = inner
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid color component \"{}\"", p.trim()))
        })
        .collect::<Result<_, _>>()?;

    fn channel(x: f64) -> u8 {
        x.clamp(0.0, 255.0).round() as u8
    }

    match parts.as_slice() {
        [r, g, b] => Ok(Rgba8::rgb(channel(*r), channel(*g), channel(*b))),
        [r, g, b, a] => Ok(Rgba8::rgba(
            channel(*r),
            channel(*g),
            channel(*b),
            channel(a.clamp(0.0, 1.0) * 255.0),
        )),
        _ => Err("rgb()/rgba() take 3 or 4 components".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/paint.rs"]
mod tests;
