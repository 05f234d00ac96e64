//! Remote answer backends.
//!
//! `Backend` is an enum over concrete implementations. Enum dispatch keeps
//! `ask` an `async fn` without trait objects or `async-trait`. Adding a
//! backend = new module + new variant + new match arms.
//!
//! A backend only reports what happened. Deciding what the visitor sees on
//! failure is the dispatcher's job.

pub mod http;
pub mod offline;

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::BackendConfig;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend disabled (offline mode)")]
    Disabled,
    #[error("unknown backend provider: {0}")]
    UnknownProvider(String),
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub rag_initialized: bool,
}

// ── Backend enum ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Backend {
    Http(http::HttpBackend),
    Offline(offline::OfflineBackend),
}

impl Backend {
    /// Send the visitor's message and return the answer text verbatim.
    pub async fn ask(&self, message: &str) -> Result<String, BackendError> {
        match self {
            Backend::Http(b) => b.ask(message).await,
            Backend::Offline(b) => b.ask(message).await,
        }
    }

    /// Probe the backend's health endpoint.
    pub async fn health(&self) -> Result<Health, BackendError> {
        match self {
            Backend::Http(b) => b.health().await,
            Backend::Offline(b) => b.health().await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Http(_) => "http",
            Backend::Offline(_) => "offline",
        }
    }
}

/// Construct the configured backend. Called once at startup.
pub fn build(config: &BackendConfig) -> Result<Backend, BackendError> {
    match config.provider.as_str() {
        "http" => Ok(Backend::Http(http::HttpBackend::new(
            config.endpoint.clone(),
            config.health_url.clone(),
        )?)),
        "offline" => Ok(Backend::Offline(offline::OfflineBackend)),
        other => Err(BackendError::UnknownProvider(other.to_string())),
    }
}
