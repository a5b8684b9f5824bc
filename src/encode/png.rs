use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{TracecardError, TracecardResult};
use crate::render::surface::RasterSurface;

/// File extension of persisted cards.
pub const ARTIFACT_EXTENSION: &str = "png";

/// Encode a composed surface as PNG bytes.
///
/// The surface holds premultiplied pixels; they are converted to straight alpha first, so
/// translucent areas keep their color after decoding.
pub fn encode_png(surface: &RasterSurface) -> TracecardResult<Vec<u8>> {
    let expected = (surface.width as usize)
        .saturating_mul(surface.height as usize)
        .saturating_mul(4);
    if surface.data.len() != expected {
        return Err(TracecardError::render(format!(
            "surface byte len {} does not match {}x{}",
            surface.data.len(),
            surface.width,
            surface.height
        )));
    }

    let img = image::RgbaImage::from_raw(
        surface.width,
        surface.height,
        surface.to_straight_rgba8(),
    )
    .ok_or_else(|| TracecardError::render("surface does not fit an RGBA image buffer"))?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
