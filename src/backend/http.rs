//! HTTP backend — `POST {endpoint}` with `{"message": ...}`, expecting
//! `{"response": ...}` back.
//!
//! Wire types are private to this module. The overall wait is bounded by the
//! dispatcher, not here; the client itself has no request timeout.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{BackendError, Health};

/// Fixed bound for health probes, independent of the chat timeout.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Constructed once at startup and cheaply cloned (`reqwest::Client` is an
/// `Arc` internally).
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    health_url: String,
}

impl HttpBackend {
    /// Loopback endpoints (a local dev server) bypass any system proxy.
    pub fn new(endpoint: String, health_url: String) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if is_loopback(&endpoint) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint, health_url })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One round-trip. Transport errors, non-2xx statuses and bodies that are
    /// not `{"response": <string>}` are all errors.
    pub async fn ask(&self, message: &str) -> Result<String, BackendError> {
        debug!(endpoint = %self.endpoint, message_len = message.len(), "sending chat request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            warn!(%status, body = %body, "chat request returned HTTP error");
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(format!("failed to read body: {e}")))?;
        trace!(body = %body, "chat response body");

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Malformed(e.to_string()))?;
        Ok(parsed.response)
    }

    /// `GET {health_url}` with a fixed 5-second bound.
    pub async fn health(&self) -> Result<Health, BackendError> {
        let response = self
            .client
            .get(&self.health_url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout(HEALTH_TIMEOUT)
                } else {
                    BackendError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        response
            .json::<Health>()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

fn is_loopback(endpoint: &str) -> bool {
    reqwest::Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .is_some_and(|host| {
            host == "localhost"
                || host
                    .trim_matches(|c| c == '[' || c == ']')
                    .parse::<std::net::IpAddr>()
                    .is_ok_and(|ip| ip.is_loopback())
        })
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}
