//! Completion notification: announce a persisted card's public URL to an external endpoint.
//!
//! Delivery is best effort. Failures are returned to the caller for logging and never undo the
//! saved artifact.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::foundation::error::{TracecardError, TracecardResult};
use crate::persist::ArtifactId;

/// Boxed future returned by [`CompletionNotifier::notify`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = TracecardResult<()>> + Send + 'a>>;

/// Receives one announcement per successfully persisted artifact.
pub trait CompletionNotifier: Send + Sync {
    /// Announce that the card at `artifact_url` is available.
    fn notify(&self, artifact_url: String) -> NotifyFuture<'_>;
}

/// Request timeout applied to webhook deliveries.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Public URL of an artifact, `<base>/get/<id>.png`.
///
/// Trailing slashes on `base` are dropped so the path never contains `//`.
pub fn public_url(base: &str, id: ArtifactId) -> String {
    format!("{}/get/{}", base.trim_end_matches('/'), id.file_name())
}

/// Posts the artifact URL as a `text/plain` body to a configured webhook.
///
/// Without a URL every notification is a no-op.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    /// Build a notifier posting to `url`, or a disabled one when `url` is `None`.
    pub fn new(url: Option<String>) -> TracecardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| TracecardError::notification(format!("failed to build client: {e}")))?;
        Ok(Self { client, url })
    }

    /// Configured endpoint, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl CompletionNotifier for WebhookNotifier {
    fn notify(&self, artifact_url: String) -> NotifyFuture<'_> {
        Box::pin(async move {
            let Some(endpoint) = self.url.as_deref() else {
                tracing::debug!(%artifact_url, "no webhook configured; skipping notification");
                return Ok(());
            };

            let response = self
                .client
                .post(endpoint)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(artifact_url)
                .send()
                .await
                .map_err(|e| TracecardError::notification(format!("webhook request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TracecardError::notification(format!(
                    "webhook answered {status}"
                )));
            }
            tracing::debug!(%status, "webhook delivered");
            Ok(())
        })
    }
}

/// In-memory notifier for tests and local runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    delivered: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    /// Notifier that records every URL and succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier that records every URL and then reports a delivery failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// URLs received so far, in arrival order.
    pub fn delivered(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CompletionNotifier for RecordingNotifier {
    fn notify(&self, artifact_url: String) -> NotifyFuture<'_> {
        Box::pin(async move {
            self.delivered
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(artifact_url);
            if self.fail {
                return Err(TracecardError::notification("recording notifier set to fail"));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/notify/webhook.rs"]
mod tests;
