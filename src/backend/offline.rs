//! Offline backend — never reaches the network, so every message is
//! answered from the knowledge base. Useful when no backend is deployed.

use super::{BackendError, Health};

#[derive(Debug, Clone)]
pub struct OfflineBackend;

impl OfflineBackend {
    pub async fn ask(&self, _message: &str) -> Result<String, BackendError> {
        Err(BackendError::Disabled)
    }

    pub async fn health(&self) -> Result<Health, BackendError> {
        Err(BackendError::Disabled)
    }
}
