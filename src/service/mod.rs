//! Card service: render a job, persist the card and announce it.
//!
//! A submission is *accepted* once rendering succeeded and an identifier was assigned. Writing
//! the file and notifying happen afterwards on a follow-up task; notification only starts once
//! the file is fully written, and fires at most once per artifact.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::foundation::error::{TracecardError, TracecardResult};
use crate::job::RenderJob;
use crate::notify::{CompletionNotifier, public_url};
use crate::persist::{ArtifactId, ArtifactStore};
use crate::render::cpu::LayerCompositor;

/// Outcome of the background persist-then-notify step.
#[derive(Debug)]
pub enum FollowUp {
    /// File written and the notifier accepted the announcement.
    Notified(PathBuf),
    /// File written but the announcement failed; the artifact is kept.
    NotifyFailed(PathBuf, TracecardError),
    /// File could not be written; no announcement was made.
    PersistFailed(TracecardError),
}

/// Returned once a job has been accepted.
#[derive(Debug)]
pub struct Receipt {
    /// Identifier of the card being persisted.
    pub artifact_id: ArtifactId,
    /// Background persist-then-notify task.
    pub follow_up: JoinHandle<FollowUp>,
}

/// Everything a request handler needs to turn jobs into published cards.
#[derive(Clone)]
pub struct CardService {
    compositor: Arc<LayerCompositor>,
    store: ArtifactStore,
    notifier: Arc<dyn CompletionNotifier>,
    public_base_url: String,
}

impl CardService {
    /// Wire a compositor, store and notifier together.
    ///
    /// `public_base_url` is the externally reachable origin artifacts are served under.
    pub fn new(
        compositor: Arc<LayerCompositor>,
        store: ArtifactStore,
        notifier: Arc<dyn CompletionNotifier>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            compositor,
            store,
            notifier,
            public_base_url: public_base_url.into(),
        }
    }

    /// Artifact store backing this service.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Render `job` and hand the card off for persistence and notification.
    ///
    /// Rendering errors are returned directly and nothing is persisted or announced.
    pub async fn submit(&self, job: RenderJob) -> TracecardResult<Receipt> {
        tracing::info!("new save from {}", job.nickname);

        let compositor = Arc::clone(&self.compositor);
        let surface = tokio::task::spawn_blocking(move || compositor.render(&job))
            .await
            .map_err(|e| TracecardError::render(format!("render task failed: {e}")))??;

        let pending = self.store.save(surface);
        let artifact_id = pending.id();
        let url = public_url(&self.public_base_url, artifact_id);
        let notifier = Arc::clone(&self.notifier);

        let follow_up = tokio::spawn(async move {
            let path = match pending.persisted().await {
                Ok(path) => path,
                Err(e) => {
                    tracing::error!(artifact = %artifact_id, error = %e, "artifact not persisted; skipping notification");
                    return FollowUp::PersistFailed(e);
                }
            };
            match notifier.notify(url).await {
                Ok(()) => FollowUp::Notified(path),
                Err(e) => {
                    tracing::warn!(artifact = %artifact_id, error = %e, "completion notification failed");
                    FollowUp::NotifyFailed(path, e)
                }
            }
        });

        Ok(Receipt {
            artifact_id,
            follow_up,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/service.rs"]
mod tests;
