//! Geographic-to-pixel projection for card rendering.
//!
//! A render derives one [`ProjectionParameters`] from the traced shape and pushes every drawn
//! point (shape, trace, map corners) through it, so all layers share a single scale and centering
//! offset. Parameters are immutable values; concurrent renders never share projection state.

use crate::foundation::core::{GeoPoint, Point};
use crate::foundation::error::{TracecardError, TracecardResult};

/// Fixed canvas geometry and axis correction used by the projector.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionConfig {
    /// Side length of the square canvas in pixels.
    pub size: u32,
    /// Uniform border reserved on every side before drawing.
    pub padding: u32,
    /// Extra weight applied to the `a` axis extent (local projection correction).
    pub anisotropy: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            size: 1000,
            padding: 200,
            anisotropy: 1.5,
        }
    }
}

impl ProjectionConfig {
    /// Check that the configuration leaves a drawable area.
    pub fn validate(&self) -> TracecardResult<()> {
        if self.size == 0 || self.size > u32::from(u16::MAX) {
            return Err(TracecardError::validation(format!(
                "canvas size must be in 1..={}, got {}",
                u16::MAX,
                self.size
            )));
        }
        if u64::from(self.padding) * 2 >= u64::from(self.size) {
            return Err(TracecardError::validation(
                "padding must leave a non-empty drawing area",
            ));
        }
        if !self.anisotropy.is_finite() || self.anisotropy <= 0.0 {
            return Err(TracecardError::validation(
                "anisotropy must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Side length of the padded drawing area.
    pub fn inner_size(&self) -> f64 {
        f64::from(self.size) - 2.0 * f64::from(self.padding)
    }
}

/// Minimal axis-aligned geographic rectangle enclosing a shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BoundingRegion {
    /// Smallest `a`.
    pub min_a: f64,
    /// Largest `a`.
    pub max_a: f64,
    /// Smallest `b`.
    pub min_b: f64,
    /// Largest `b`.
    pub max_b: f64,
}

impl BoundingRegion {
    /// Scan `shape` for its extents.
    ///
    /// Fails with [`TracecardError::InvalidRegion`] when `shape` is empty.
    pub fn from_shape(shape: &[GeoPoint]) -> TracecardResult<Self> {
        let (first, rest) = shape.split_first().ok_or(TracecardError::InvalidRegion)?;
        let init = Self {
            min_a: first.a,
            max_a: first.a,
            min_b: first.b,
            max_b: first.b,
        };
        Ok(rest.iter().fold(init, |r, p| Self {
            min_a: r.min_a.min(p.a),
            max_a: r.max_a.max(p.a),
            min_b: r.min_b.min(p.b),
            max_b: r.max_b.max(p.b),
        }))
    }

    /// Return `true` when `p` lies inside or on the region.
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.min_a <= p.a && p.a <= self.max_a && self.min_b <= p.b && p.b <= self.max_b
    }
}

/// Per-render scale and centering offsets.
///
/// `width` is the anisotropy-weighted `a` extent and `height` the raw `b` extent. The horizontal
/// offset is derived from `height` and the vertical one from `width`; keep that pairing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProjectionParameters {
    /// Region the parameters were derived from.
    pub region: BoundingRegion,
    /// Pixels per geographic unit.
    pub scale: f64,
    /// Horizontal centering offset in pixels.
    pub offset_width: f64,
    /// Vertical centering offset in pixels.
    pub offset_height: f64,
    /// Axis weight copied from the config.
    pub anisotropy: f64,
    size: f64,
    padding: f64,
}

impl ProjectionParameters {
    /// Map a geographic point to canvas pixels.
    ///
    /// Pure function of `(point, self)`. Pixel rows grow downward while `a` grows northward, so
    /// the vertical axis is flipped.
    pub fn project(&self, point: GeoPoint) -> Point {
        let r = &self.region;
        let px = self.padding + (point.b - r.min_b) * self.scale + self.offset_width;
        let py = self.size - self.padding - (point.a - r.min_a) * self.scale * self.anisotropy
            + self.offset_height;
        Point::new(px, py)
    }

    /// Project a sequence of points, preserving order.
    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<Point> {
        points.iter().map(|&p| self.project(p)).collect()
    }
}

/// Derives [`ProjectionParameters`] from a shape under a fixed [`ProjectionConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CoordinateProjector {
    config: ProjectionConfig,
}

impl CoordinateProjector {
    /// Create a projector, validating the configuration.
    pub fn new(config: ProjectionConfig) -> TracecardResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Borrow the configuration.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Compute projection parameters from `shape` alone.
    ///
    /// Errors:
    /// - [`TracecardError::InvalidRegion`] for an empty shape.
    /// - [`TracecardError::DegenerateRegion`] when both extents are zero.
    pub fn compute_parameters(&self, shape: &[GeoPoint]) -> TracecardResult<ProjectionParameters> {
        let region = BoundingRegion::from_shape(shape)?;
        let anisotropy = self.config.anisotropy;

        let width = (region.max_a - region.min_a).abs() * anisotropy;
        let height = (region.max_b - region.min_b).abs();
        let larger = width.max(height);
        if larger == 0.0 {
            return Err(TracecardError::DegenerateRegion);
        }
        if !larger.is_finite() {
            return Err(TracecardError::validation("shape extent is not finite"));
        }

        let inner = self.config.inner_size();
        let scale = inner / larger;
        let params = ProjectionParameters {
            region,
            scale,
            offset_width: (inner - height * scale) / 2.0,
            offset_height: (inner - width * scale) / 2.0,
            anisotropy,
            size: f64::from(self.config.size),
            padding: f64::from(self.config.padding),
        };
        tracing::debug!(
            scale = params.scale,
            offset_width = params.offset_width,
            offset_height = params.offset_height,
            "projection parameters"
        );
        Ok(params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/projection.rs"]
mod tests;
