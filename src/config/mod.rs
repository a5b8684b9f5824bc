//! Process configuration read from the environment.

use std::path::PathBuf;

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 8888;

/// Runtime settings of the HTTP service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on (all interfaces).
    pub port: u16,
    /// Completion webhook; `None` disables notification.
    pub webhook_url: Option<String>,
    /// Public origin used to build artifact URLs.
    pub self_url: String,
    /// Directory artifacts are written to and served from.
    pub export_dir: PathBuf,
    /// Root the font, logos and base map are loaded from.
    pub assets_dir: PathBuf,
}

impl ServerConfig {
    /// Read settings from process environment variables.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `PORT` | `8888` |
    /// | `WEBHOOK_URL` (fallback `ZAPIER_URL`) | unset |
    /// | `SELF_URL` | `http://localhost:<port>` |
    /// | `EXPORT_DIR` | `export` |
    /// | `ASSETS_DIR` | `.` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let webhook_url = var("WEBHOOK_URL").or_else(|| var("ZAPIER_URL"));
        let self_url = var("SELF_URL").unwrap_or_else(|| format!("http://localhost:{port}"));

        Self {
            port,
            webhook_url,
            self_url,
            export_dir: var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("export")),
            assets_dir: var("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/env.rs"]
mod tests;
