//! Tracecard renders a hand-drawn trace and a traced shape, both given in geographic
//! coordinates, into a fixed-size PNG card over a cropped base map.
//!
//! The pipeline is:
//!
//! - Decode a [`Submission`] into a validated [`RenderJob`]
//! - Project the shape's bounding region onto the padded canvas ([`CoordinateProjector`])
//! - Stack map, wash, label, logos and strokes in a fixed order ([`LayerCompositor`])
//! - Persist the PNG under a fresh [`ArtifactId`] and announce its URL ([`CardService`])
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Startup assets.
pub mod assets;
/// Environment configuration.
pub mod config;
/// PNG encoding.
pub mod encode;
/// Submission decoding.
pub mod job;
/// Completion notification.
pub mod notify;
/// Artifact persistence.
pub mod persist;
/// Geographic-to-pixel projection.
pub mod projection;
/// Layer compositing.
pub mod render;
/// HTTP routes.
pub mod server;
/// Render, persist and notify orchestration.
pub mod service;

pub use crate::foundation::core::{Affine, BezPath, GeoPoint, PixelRect, Point, Rect, Rgba8};
pub use crate::foundation::error::{TracecardError, TracecardResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::store::{AssetPaths, CardAssets};
pub use crate::config::ServerConfig;
pub use crate::encode::encode_png;
pub use crate::job::{RenderJob, Submission};
pub use crate::notify::{CompletionNotifier, RecordingNotifier, WebhookNotifier, public_url};
pub use crate::persist::{ArtifactId, ArtifactStore, PendingArtifact};
pub use crate::projection::{
    BoundingRegion, CoordinateProjector, ProjectionConfig, ProjectionParameters,
};
pub use crate::render::cpu::{Layer, LayerCompositor};
pub use crate::render::layout::{CardLayout, LabelStyle, MapReference, StrokeStyle};
pub use crate::render::surface::RasterSurface;
pub use crate::service::{CardService, FollowUp, Receipt};
