use std::path::Path;

use anyhow::Context;
use image::ImageEncoder;

use crate::foundation::error::{GeoflightError, GeoflightResult};
use crate::render::cpu::FrameRGBA;

/// Encode a frame as an RGBA8 PNG.
pub fn encode_png(frame: &FrameRGBA) -> GeoflightResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(GeoflightError::validation(format!(
            "frame buffer has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let straight;
    let pixels = if frame.premultiplied {
        straight = unpremultiply_rgba8(&frame.data);
        straight.as_slice()
    } else {
        frame.data.as_slice()
    };

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .context("encode png")?;
    Ok(out)
}

pub fn write_png(path: &Path, frame: &FrameRGBA) -> GeoflightResult<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply_rgba8(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/png.rs"]
mod tests;
