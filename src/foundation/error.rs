/// Convenience result type used across tracecard.
pub type TracecardResult<T> = Result<T, TracecardError>;

/// Top-level error taxonomy for rendering, persisting and announcing cards.
#[derive(thiserror::Error, Debug)]
pub enum TracecardError {
    /// The traced shape has no points, so no bounding region exists.
    #[error("invalid region: shape must contain at least one point")]
    InvalidRegion,

    /// The traced shape collapses to zero extent on both axes.
    #[error("degenerate region: shape has zero extent")]
    DegenerateRegion,

    /// Malformed submission data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A startup asset (font, logo, base map) could not be read or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Rasterization failed after the job was validated.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or writing the artifact failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The completion webhook could not be delivered.
    #[error("notification error: {0}")]
    Notification(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TracecardError {
    /// Build a [`TracecardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TracecardError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`TracecardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TracecardError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`TracecardError::Notification`] value.
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Return `true` for errors caused by the submitted job itself.
    ///
    /// These are reported back to the submitter; everything else is a server-side fault.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRegion | Self::DegenerateRegion | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
