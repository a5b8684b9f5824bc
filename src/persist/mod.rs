//! Artifact persistence: encode a composed card and store it under a fresh identifier.
//!
//! [`ArtifactStore::save`] hands back the identifier immediately and finishes encoding and
//! writing in the background. Callers that need the bytes on disk await
//! [`PendingArtifact::persisted`].

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::encode::{ARTIFACT_EXTENSION, encode_png};
use crate::foundation::error::{TracecardError, TracecardResult};
use crate::render::surface::RasterSurface;

/// Opaque identifier of a persisted card (random UUIDv4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Draw a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// File name the artifact is stored under, e.g. `<uuid>.png`.
    pub fn file_name(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.0)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Directory-backed store of encoded cards.
///
/// Artifacts are write-once: every save draws a new identifier and nothing is overwritten on
/// purpose.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> TracecardResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TracecardError::persistence(format!(
                "failed to create export dir '{}': {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Export directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact with `id` is (or will be) stored at.
    pub fn path_for(&self, id: ArtifactId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// Start persisting `surface` under a fresh identifier.
    ///
    /// Returns as soon as the identifier exists. Encoding runs on the blocking pool and the write
    /// on the async runtime; the outcome is delivered through the returned [`PendingArtifact`].
    /// Must be called from within a Tokio runtime.
    pub fn save(&self, surface: RasterSurface) -> PendingArtifact {
        let id = ArtifactId::new_v4();
        let path = self.path_for(id);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = write_artifact(surface, &path).await;
            match &result {
                Ok(p) => tracing::info!(artifact = %id, path = %p.display(), "saved export"),
                Err(e) => tracing::error!(artifact = %id, error = %e, "failed to save export"),
            }
            // Receiver may have been dropped by a caller that does not care about completion.
            let _ = tx.send(result);
        });

        PendingArtifact { id, rx }
    }
}

async fn write_artifact(surface: RasterSurface, path: &Path) -> TracecardResult<PathBuf> {
    let bytes = tokio::task::spawn_blocking(move || encode_png(&surface))
        .await
        .map_err(|e| TracecardError::persistence(format!("encode task failed: {e}")))??;
    tokio::fs::write(path, &bytes).await.map_err(|e| {
        TracecardError::persistence(format!("failed to write '{}': {e}", path.display()))
    })?;
    Ok(path.to_path_buf())
}

/// Handle to an artifact whose identifier is assigned but whose bytes may not be on disk yet.
#[derive(Debug)]
pub struct PendingArtifact {
    id: ArtifactId,
    rx: oneshot::Receiver<TracecardResult<PathBuf>>,
}

impl PendingArtifact {
    /// Identifier assigned at save time.
    pub fn id(&self) -> ArtifactId {
        self.id
    }

    /// Wait until the artifact is fully written, returning its path.
    pub async fn persisted(self) -> TracecardResult<PathBuf> {
        self.rx.await.map_err(|_| {
            TracecardError::persistence(format!(
                "persistence of {} ended without a result",
                self.id
            ))
        })?
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
