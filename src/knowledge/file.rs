//! Operator-authored knowledge files.
//!
//! ```toml
//! suggestions = ["Show best project", "Contact info"]
//!
//! [answers]
//! default = "I can tell you about my **projects**."
//! projects = "I've built ..."
//!
//! [[rules]]
//! trigger = "project"
//! topic = "projects"
//! ```
//!
//! Rules are an array of tables so their order survives parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{KeywordRule, KnowledgeBase, KnowledgeError};

#[derive(Deserialize)]
struct RawKnowledge {
    answers: HashMap<String, String>,
    #[serde(default)]
    rules: Vec<RawRule>,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct RawRule {
    trigger: String,
    topic: String,
}

/// Read, parse and validate a knowledge file.
pub fn load(path: &Path) -> Result<KnowledgeBase, KnowledgeError> {
    let text = fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse(&text, &path.display().to_string())
}

/// Parse knowledge TOML. `origin` only labels errors.
pub fn parse(text: &str, origin: &str) -> Result<KnowledgeBase, KnowledgeError> {
    let raw: RawKnowledge = toml::from_str(text).map_err(|e| KnowledgeError::Parse {
        path: origin.to_string(),
        reason: e.to_string(),
    })?;

    debug!(
        origin,
        answers = raw.answers.len(),
        rules = raw.rules.len(),
        suggestions = raw.suggestions.len(),
        "knowledge file parsed"
    );

    let rules = raw
        .rules
        .into_iter()
        .map(|r| KeywordRule::new(r.trigger, r.topic))
        .collect();

    KnowledgeBase::new(raw.answers, rules, raw.suggestions)
}
