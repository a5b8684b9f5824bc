//! HTTP surface: job ingress, artifact retrieval and health checks.
//!
//! | route | behavior |
//! |---|---|
//! | `POST /save` | decode a submission, render it, answer `OK` once handed to persistence |
//! | `GET /get/<id>.png` | serve a persisted card from the export directory |
//! | `GET /upkeep`, `GET /healthz` | liveness check, answers `OK` |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::assets::store::{AssetPaths, CardAssets};
use crate::config::ServerConfig;
use crate::foundation::error::{TracecardError, TracecardResult};
use crate::job::{RenderJob, Submission};
use crate::notify::WebhookNotifier;
use crate::persist::ArtifactStore;
use crate::render::cpu::LayerCompositor;
use crate::render::layout::CardLayout;
use crate::service::CardService;

/// Build the application router around `service`.
///
/// Persisted cards are served from the service's export directory under `/get`.
pub fn router(service: CardService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let exports = ServeDir::new(service.store().dir());

    Router::new()
        .route("/save", post(save))
        .route("/upkeep", get(upkeep))
        .route("/healthz", get(upkeep))
        .nest_service("/get", exports)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Load assets and wire the production service from `config`.
pub fn build_service(config: &ServerConfig) -> TracecardResult<CardService> {
    let assets = CardAssets::load(&config.assets_dir, &AssetPaths::default())?;
    let compositor = LayerCompositor::new(CardLayout::default(), Arc::new(assets))?;
    let store = ArtifactStore::new(&config.export_dir)?;

    if config.webhook_url.is_none() {
        tracing::info!("no webhook configured; completion notifications disabled");
    }
    let notifier = WebhookNotifier::new(config.webhook_url.clone())?;

    Ok(CardService::new(
        Arc::new(compositor),
        store,
        Arc::new(notifier),
        config.self_url.clone(),
    ))
}

/// Run the service on `0.0.0.0:<port>` until the process stops.
pub async fn serve(config: ServerConfig) -> TracecardResult<()> {
    let service = build_service(&config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    tracing::info!(export_dir = %config.export_dir.display(), "tracecard listening on http://{addr}");
    axum::serve(listener, router(service))
        .await
        .context("http server stopped")?;
    Ok(())
}

async fn save(
    State(service): State<CardService>,
    Json(submission): Json<Submission>,
) -> Result<&'static str, TracecardError> {
    let job = RenderJob::from_submission(submission)?;
    let receipt = service.submit(job).await?;
    tracing::debug!(artifact = %receipt.artifact_id, "submission accepted");
    Ok("OK")
}

async fn upkeep() -> &'static str {
    "OK"
}

impl IntoResponse for TracecardError {
    fn into_response(self) -> Response {
        let status = if self.is_request_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/server/responses.rs"]
mod tests;
