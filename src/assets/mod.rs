//! Startup assets: font, logos and base map.

/// Raster decoding into premultiplied pixels.
pub mod decode;
/// Asset loading and text layout.
pub mod store;
