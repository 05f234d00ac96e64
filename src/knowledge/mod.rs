//! Knowledge base — the canned answers the widget falls back to.
//!
//! A [`KnowledgeBase`] is immutable once built: a topic → answer table, an
//! ordered list of [`KeywordRule`]s, and the suggestion prompts shown to the
//! visitor. It is shared as `Arc<KnowledgeBase>` and never mutated.
//!
//! Two sources:
//! - [`KnowledgeBase::builtin`] — the compiled-in portfolio content.
//! - [`KnowledgeBase::from_toml_file`] — an operator-authored file, validated
//!   on load (see [`file`]).

mod builtin;
pub mod file;

use std::collections::HashMap;

use thiserror::Error;

/// Topic every lookup degrades to. Must exist in every knowledge base.
pub const DEFAULT_TOPIC: &str = "default";

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("missing required \"default\" answer")]
    MissingDefault,
    #[error("rule '{trigger}' targets unknown topic '{topic}'")]
    UnknownTopic { trigger: String, topic: String },
    #[error("empty trigger for topic '{topic}'")]
    EmptyTrigger { topic: String },
    #[error("cannot read {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("parse error in {path}: {reason}")]
    Parse { path: String, reason: String },
}

// ── KeywordRule ───────────────────────────────────────────────────────────────

/// A lowercase substring trigger pointing at a topic. Rules are scanned in
/// order and the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub trigger: String,
    pub topic: String,
}

impl KeywordRule {
    pub fn new(trigger: impl Into<String>, topic: impl Into<String>) -> Self {
        Self { trigger: trigger.into(), topic: topic.into() }
    }
}

// ── KnowledgeBase ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    answers: HashMap<String, String>,
    rules: Vec<KeywordRule>,
    suggestions: Vec<String>,
}

impl KnowledgeBase {
    /// Build and validate a knowledge base.
    ///
    /// Triggers are lowercased so matching stays case-insensitive no matter
    /// how the operator wrote them.
    pub fn new(
        answers: HashMap<String, String>,
        rules: Vec<KeywordRule>,
        suggestions: Vec<String>,
    ) -> Result<Self, KnowledgeError> {
        if !answers.contains_key(DEFAULT_TOPIC) {
            return Err(KnowledgeError::MissingDefault);
        }

        let mut normalized = Vec::with_capacity(rules.len());
        for rule in rules {
            let trigger = rule.trigger.trim().to_lowercase();
            if trigger.is_empty() {
                return Err(KnowledgeError::EmptyTrigger { topic: rule.topic });
            }
            if !answers.contains_key(&rule.topic) {
                return Err(KnowledgeError::UnknownTopic { trigger, topic: rule.topic });
            }
            normalized.push(KeywordRule { trigger, topic: rule.topic });
        }

        Ok(Self { answers, rules: normalized, suggestions })
    }

    /// Compiled-in portfolio content.
    pub fn builtin() -> Self {
        let answers = builtin::ANSWERS
            .iter()
            .map(|(topic, answer)| (topic.to_string(), answer.to_string()))
            .collect();
        let rules = builtin::RULES
            .iter()
            .map(|(trigger, topic)| KeywordRule::new(*trigger, *topic))
            .collect();
        let suggestions = builtin::SUGGESTIONS.iter().map(|s| s.to_string()).collect();
        Self { answers, rules, suggestions }
    }

    /// Load an operator-authored knowledge file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, KnowledgeError> {
        file::load(path)
    }

    /// Answer for `topic`, or the default answer when the topic is unknown.
    pub fn lookup(&self, topic: &str) -> &str {
        self.answers
            .get(topic)
            .or_else(|| self.answers.get(DEFAULT_TOPIC))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Fallback matcher: the topic of the first rule whose trigger occurs in
    /// the lowercased message, or [`DEFAULT_TOPIC`].
    pub fn match_topic(&self, message: &str) -> &str {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(&rule.trigger))
            .map(|rule| rule.topic.as_str())
            .unwrap_or(DEFAULT_TOPIC)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.answers.contains_key(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn builtin_passes_validation() {
        let kb = KnowledgeBase::builtin();
        let rebuilt = KnowledgeBase::new(
            kb.answers.clone(),
            kb.rules.clone(),
            kb.suggestions.clone(),
        );
        assert!(rebuilt.is_ok(), "builtin content must be valid: {rebuilt:?}");
    }

    #[test]
    fn builtin_triggers_are_lowercase() {
        for rule in KnowledgeBase::builtin().rules() {
            assert_eq!(rule.trigger, rule.trigger.to_lowercase());
        }
    }

    #[test]
    fn lookup_returns_authored_answer_for_every_topic() {
        let kb = KnowledgeBase::builtin();
        for (topic, answer) in builtin::ANSWERS {
            assert_eq!(kb.lookup(topic), *answer);
        }
    }

    #[test]
    fn lookup_unknown_topic_is_default() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.lookup("weather"), kb.lookup(DEFAULT_TOPIC));
    }

    #[test]
    fn no_match_is_default() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.match_topic("how is the weather today"), DEFAULT_TOPIC);
        assert_eq!(kb.match_topic(""), DEFAULT_TOPIC);
    }

    #[test]
    fn matching_ignores_case() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.match_topic("PROJECTS please"), kb.match_topic("projects please"));
        assert_eq!(kb.match_topic("PROJECTS please"), "projects");
    }

    #[test]
    fn matching_is_substring_based() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.match_topic("do you do devops?"), "gemini");
        assert_eq!(kb.match_topic("xxdevopsxx"), "gemini");
    }

    #[test]
    fn skills_question_is_not_captured_by_about() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.match_topic("tell me about your skills"), "skills");
        assert_eq!(kb.match_topic("tell me about yourself"), "about");
    }

    #[test]
    fn every_suggestion_resolves_to_a_real_topic() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.suggestions().len(), 4);
        for s in kb.suggestions() {
            assert_ne!(kb.match_topic(s), DEFAULT_TOPIC, "suggestion '{s}' fell through");
        }
    }

    #[test]
    fn first_rule_wins() {
        let kb = KnowledgeBase::new(
            answers(&[("default", "d"), ("a", "A"), ("b", "B")]),
            vec![KeywordRule::new("foo", "a"), KeywordRule::new("foo bar", "b")],
            vec![],
        )
        .unwrap();
        assert_eq!(kb.match_topic("foo bar"), "a");
    }

    #[test]
    fn missing_default_rejected() {
        let err = KnowledgeBase::new(answers(&[("a", "A")]), vec![], vec![]).unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingDefault));
    }

    #[test]
    fn rule_with_unknown_topic_rejected() {
        let err = KnowledgeBase::new(
            answers(&[("default", "d")]),
            vec![KeywordRule::new("x", "nowhere")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::UnknownTopic { .. }));
    }

    #[test]
    fn blank_trigger_rejected() {
        let err = KnowledgeBase::new(
            answers(&[("default", "d")]),
            vec![KeywordRule::new("   ", "default")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::EmptyTrigger { .. }));
    }

    #[test]
    fn mixed_case_triggers_are_normalized() {
        let kb = KnowledgeBase::new(
            answers(&[("default", "d"), ("a", "A")]),
            vec![KeywordRule::new("  DevOps ", "a")],
            vec![],
        )
        .unwrap();
        assert_eq!(kb.rules()[0].trigger, "devops");
        assert_eq!(kb.match_topic("I like DEVOPS"), "a");
    }
}
