//! Application-wide error types.
//!
//! Errors raised while answering a visitor never reach this type: backend
//! failures are absorbed by the dispatcher and view failures by the chat
//! session. `AppError` covers start-up and CLI failures only.

use thiserror::Error;

use crate::backend::BackendError;
use crate::knowledge::KnowledgeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
