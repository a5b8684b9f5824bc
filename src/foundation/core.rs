use crate::foundation::error::{TracecardError, TracecardResult};

pub use kurbo::{Affine, BezPath, Point, Rect};

/// Geographic coordinate pair `(a, b)`.
///
/// `a` is the latitude-like (northing) component and `b` the longitude-like (easting) component.
/// No unit conversion is ever applied; the projector treats both as opaque numbers.
/// On the wire a point is a two-element array `[a, b]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    /// Latitude-like component.
    pub a: f64,
    /// Longitude-like component.
    pub b: f64,
}

impl GeoPoint {
    /// Create a point from its two components.
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Reject NaN and infinite components.
    pub fn validate(self) -> TracecardResult<Self> {
        if !self.a.is_finite() || !self.b.is_finite() {
            return Err(TracecardError::validation(format!(
                "point ({}, {}) must have finite coordinates",
                self.a, self.b
            )));
        }
        Ok(self)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([a, b]: [f64; 2]) -> Self {
        Self { a, b }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.a, p.b]
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from straight-alpha channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha derived from an opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }
}

/// Axis-aligned placement rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width; may be negative when built from two arbitrary corners.
    pub w: f64,
    /// Height; may be negative when built from two arbitrary corners.
    pub h: f64,
}

impl PixelRect {
    /// Create a rectangle from origin and size.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanning from `top_left` to `bottom_right`, without reordering the corners.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            w: bottom_right.x - top_left.x,
            h: bottom_right.y - top_left.y,
        }
    }

    /// Transform that maps the unit-free source box `(0, 0, src_w, src_h)` onto this rectangle.
    ///
    /// Negative widths/heights mirror the source, matching how a 2D canvas stretches images.
    pub fn fit_transform(&self, src_w: f64, src_h: f64) -> Affine {
        let sx = if src_w > 0.0 { self.w / src_w } else { 0.0 };
        let sy = if src_h > 0.0 { self.h / src_h } else { 0.0 };
        Affine::translate((self.x, self.y)) * Affine::scale_non_uniform(sx, sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
