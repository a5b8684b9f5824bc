use std::path::Path;
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{TracecardError, TracecardResult};

/// Asset locations relative to an assets root directory.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetPaths {
    /// Bold display typeface used for the nickname label.
    pub font: String,
    /// Primary branding logo (top-left).
    pub primary_logo: String,
    /// Secondary branding logo (bottom-right).
    pub secondary_logo: String,
    /// Base map raster covering the map reference extent.
    pub base_map: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            font: "fonts/NUNITO-BOLD.TTF".to_owned(),
            primary_logo: "images/ostrovy-logo.png".to_owned(),
            secondary_logo: "images/duha-logo.png".to_owned(),
            base_map: "images/map.png".to_owned(),
        }
    }
}

/// Read-only assets shared by every render.
///
/// Loaded once at startup; any failure is fatal for the service.
#[derive(Clone, Debug)]
pub struct CardAssets {
    /// Raw font file bytes.
    pub font: Arc<Vec<u8>>,
    /// Primary logo pixels.
    pub primary_logo: PreparedImage,
    /// Secondary logo pixels.
    pub secondary_logo: PreparedImage,
    /// Base map pixels.
    pub base_map: PreparedImage,
}

impl CardAssets {
    /// Load and decode all assets under `root`.
    ///
    /// Every failure is reported as [`TracecardError::AssetLoad`] naming the offending file.
    pub fn load(root: impl AsRef<Path>, paths: &AssetPaths) -> TracecardResult<Self> {
        let root = root.as_ref();
        let font = read_asset(root, &paths.font)?;
        let assets = Self::from_encoded(
            font,
            &read_asset(root, &paths.primary_logo)?,
            &read_asset(root, &paths.secondary_logo)?,
            &read_asset(root, &paths.base_map)?,
        )?;
        tracing::info!(root = %root.display(), "card assets loaded");
        Ok(assets)
    }

    /// Build assets from in-memory font bytes and encoded images.
    pub fn from_encoded(
        font: Vec<u8>,
        primary_logo: &[u8],
        secondary_logo: &[u8],
        base_map: &[u8],
    ) -> TracecardResult<Self> {
        TextLayoutEngine::new()
            .register_font(&font)
            .map_err(|e| TracecardError::asset_load(format!("font: {e}")))?;
        let decode = |name: &str, bytes: &[u8]| {
            decode_image(bytes).map_err(|e| TracecardError::asset_load(format!("{name}: {e}")))
        };
        Ok(Self {
            font: Arc::new(font),
            primary_logo: decode("primary logo", primary_logo)?,
            secondary_logo: decode("secondary logo", secondary_logo)?,
            base_map: decode("base map", base_map)?,
        })
    }
}

fn read_asset(root: &Path, rel: &str) -> TracecardResult<Vec<u8>> {
    let p = root.join(rel);
    std::fs::read(&p).map_err(|e| {
        TracecardError::asset_load(format!("failed to read asset '{}': {e}", p.display()))
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register `font_bytes` and return the family name of the first face.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> TracecardResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TracecardError::validation("no font families registered from font bytes")
        })?;

        Ok(self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TracecardError::validation("registered font family has no name"))?
            .to_string())
    }

    /// Register `font_bytes`, then lay out `text` with it.
    ///
    /// Convenient for one-off layouts; repeated callers should register once and use
    /// [`TextLayoutEngine::layout_line`].
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TracecardResult<parley::Layout<TextBrushRgba8>> {
        let family = self.register_font(font_bytes)?;
        self.layout_line(text, &family, size_px, brush)
    }

    /// Shape and lay out a single unwrapped line of text in an already registered `family`.
    ///
    /// Glyph positions are relative to the layout's top-left corner.
    pub fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TracecardResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TracecardError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Borrowed(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
