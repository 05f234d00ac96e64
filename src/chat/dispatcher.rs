//! Message dispatch: one bounded remote attempt, then the knowledge base.
//!
//! ```text
//! Idle → AwaitingRemote ─ok──────────────→ Reply { Remote }
//!                       └─err / timeout──→ Fallback → Reply { Fallback }
//! ```
//!
//! Holds no mutable state, so any number of `respond` calls may be in
//! flight at once; each resolves to the answer for its own message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::{Backend, BackendError};
use crate::knowledge::KnowledgeBase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    Fallback { topic: String },
}

/// Answer text plus where it came from. Only `text` is shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ReplySource::Fallback { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    knowledge: Arc<KnowledgeBase>,
    backend: Backend,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(knowledge: Arc<KnowledgeBase>, backend: Backend, timeout: Duration) -> Self {
        Self { knowledge, backend, timeout }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Answer `message`. Whitespace-only input returns `None` without
    /// touching the network. Backend failures never surface; they turn into
    /// a knowledge-base answer.
    pub async fn respond(&self, message: &str) -> Option<Reply> {
        if message.trim().is_empty() {
            debug!("ignoring empty message");
            return None;
        }

        let attempt = tokio::time::timeout(self.timeout, self.backend.ask(message)).await;
        let outcome = match attempt {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) => {
                debug!(backend = self.backend.name(), reply_len = text.len(), "remote reply");
                Some(Reply { text, source: ReplySource::Remote })
            }
            Err(e) => {
                let reply = self.fallback(message);
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    source = ?reply.source,
                    "backend unavailable — answering from knowledge base"
                );
                Some(reply)
            }
        }
    }

    /// Local keyword match against the knowledge base.
    pub fn fallback(&self, message: &str) -> Reply {
        let topic = self.knowledge.match_topic(message);
        Reply {
            text: self.knowledge.lookup(topic).to_string(),
            source: ReplySource::Fallback { topic: topic.to_string() },
        }
    }
}
