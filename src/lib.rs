//! Portfolio chat widget.
//!
//! Sends a visitor's message to a backend endpoint and, when that fails,
//! answers from a local keyword-matched [`knowledge::KnowledgeBase`].
//! The host UI is reached only through the [`transcript::ChatView`] port.

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod logger;
pub mod render;
pub mod transcript;

#[cfg(feature = "channel-console")]
pub mod console;
