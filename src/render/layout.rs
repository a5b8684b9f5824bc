use crate::foundation::core::{GeoPoint, PixelRect, Point, Rgba8};
use crate::foundation::error::{TracecardError, TracecardResult};
use crate::projection::ProjectionConfig;

/// Geographic extent the base map image covers.
///
/// Only used to place the map inside the projected space; never part of the bounding region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapReference {
    /// Geographic point under the image's top-left pixel.
    pub top_left: GeoPoint,
    /// Geographic point under the image's bottom-right pixel.
    pub bottom_right: GeoPoint,
}

impl Default for MapReference {
    fn default() -> Self {
        Self {
            top_left: GeoPoint::new(49.5629331, 15.9357536),
            bottom_right: GeoPoint::new(49.5588008, 15.9471531),
        }
    }
}

/// Nickname label styling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelStyle {
    /// Top-left anchor of the text box in pixels (top-aligned baseline).
    pub anchor: Point,
    /// Font size in pixels.
    pub size_px: f32,
    /// Text color.
    pub color: Rgba8,
}

/// Polyline stroke styling. Caps and joins are always round.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    /// Stroke color (straight alpha).
    pub color: Rgba8,
    /// Line width in pixels.
    pub width: f64,
}

/// Every fixed drawing constant of a card.
///
/// Passed into the compositor at construction so tests can vary geometry without globals.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardLayout {
    /// Canvas size, padding and axis correction.
    pub projection: ProjectionConfig,
    /// Extent of the base map image.
    pub map: MapReference,
    /// Full-canvas translucent overlay drawn over the map.
    pub wash: Rgba8,
    /// Nickname label.
    pub label: LabelStyle,
    /// Placement of the primary logo.
    pub primary_logo: PixelRect,
    /// Placement of the secondary logo.
    pub secondary_logo: PixelRect,
    /// Free-hand trace stroke.
    pub trace_stroke: StrokeStyle,
    /// Shape outline stroke.
    pub shape_stroke: StrokeStyle,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            map: MapReference::default(),
            wash: Rgba8::WHITE.with_opacity(0.8),
            label: LabelStyle {
                anchor: Point::new(50.0, 900.0),
                size_px: 40.0,
                color: Rgba8::BLACK,
            },
            primary_logo: PixelRect::new(40.0, 40.0, 250.0, 170.0),
            secondary_logo: PixelRect::new(830.0, 910.0, 130.0, 50.0),
            trace_stroke: StrokeStyle {
                color: Rgba8::new(117, 121, 238, 255).with_opacity(0.2),
                width: 30.0,
            },
            shape_stroke: StrokeStyle {
                color: Rgba8::BLACK,
                width: 10.0,
            },
        }
    }
}

impl CardLayout {
    /// Canvas side length in pixels.
    pub fn size(&self) -> u32 {
        self.projection.size
    }

    /// Reject layouts that cannot be rendered.
    pub fn validate(&self) -> TracecardResult<()> {
        self.projection.validate()?;
        self.map.top_left.validate()?;
        self.map.bottom_right.validate()?;
        if !self.label.size_px.is_finite() || self.label.size_px <= 0.0 {
            return Err(TracecardError::validation(
                "label size_px must be finite and > 0",
            ));
        }
        for (name, s) in [("trace", self.trace_stroke), ("shape", self.shape_stroke)] {
            if !s.width.is_finite() || s.width <= 0.0 {
                return Err(TracecardError::validation(format!(
                    "{name} stroke width must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}
