use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::TracecardResult;
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug)]
/// Raster image decoded to premultiplied RGBA8.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes (any format `image` recognizes) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TracecardResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
