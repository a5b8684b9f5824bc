use std::borrow::Cow;

use crate::foundation::core::GeoPoint;
use crate::foundation::error::{TracecardError, TracecardResult};

/// Ingress payload as posted by clients.
///
/// ```json
/// { "nickname": "Ada%20L.", "points": [[49.56, 15.94]], "shape": [[49.56, 15.94], [49.55, 15.95]] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Percent-encoded display name.
    pub nickname: String,
    /// Free-hand trace, in drawing order.
    pub points: Vec<GeoPoint>,
    /// Traced boundary, in drawing order.
    pub shape: Vec<GeoPoint>,
}

/// One render request, decoded and validated.
///
/// Lives only for the duration of a request; only its rendered output is persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    /// Display name, already percent-decoded.
    pub nickname: String,
    /// Free-hand path. May be empty; never affects the bounding region.
    pub trace: Vec<GeoPoint>,
    /// Traced boundary. Must be non-empty for a render to succeed.
    pub shape: Vec<GeoPoint>,
}

impl RenderJob {
    /// Build a job from already-decoded parts, validating every coordinate.
    pub fn new(
        nickname: impl Into<String>,
        trace: Vec<GeoPoint>,
        shape: Vec<GeoPoint>,
    ) -> TracecardResult<Self> {
        for p in trace.iter().chain(shape.iter()) {
            p.validate()?;
        }
        Ok(Self {
            nickname: nickname.into(),
            trace,
            shape,
        })
    }

    /// Decode a wire [`Submission`].
    ///
    /// The nickname is percent-decoded with URI component rules (`+` stays a plus sign).
    /// Shape emptiness is not checked here; the projector reports it as
    /// [`TracecardError::InvalidRegion`].
    pub fn from_submission(sub: Submission) -> TracecardResult<Self> {
        let nickname = decode_nickname(&sub.nickname)?;
        Self::new(nickname, sub.points, sub.shape)
    }
}

fn decode_nickname(raw: &str) -> TracecardResult<String> {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|e| TracecardError::validation(format!("nickname is not valid UTF-8: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/job/model.rs"]
mod tests;
