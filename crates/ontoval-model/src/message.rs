//! Validator message types.
//!
//! A [`ValidatorMessage`] is one finding produced by a rule. Findings are
//! data: a subject that fails a rule yields messages, never an error.

use serde::{Deserialize, Serialize};

use crate::subject::{Subject, TermRef};

/// Message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note
    Info,
    /// Should review
    Warn,
    /// Subject does not conform
    Error,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warn => "Warning",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What a message is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContext {
    /// A data object, by its position in the validated input.
    Object {
        index: usize,
        kind: String,
        id: Option<String>,
    },
    /// An ontology term.
    Term(TermRef),
}

impl MessageContext {
    /// Build the context that points at `subject` (at position `index`).
    pub fn for_subject(subject: &Subject, index: usize) -> Self {
        match subject {
            Subject::Object(object) => MessageContext::Object {
                index,
                kind: object.kind.clone(),
                id: object.id.clone(),
            },
            Subject::Term(term) => MessageContext::Term(term.clone()),
        }
    }
}

/// One finding emitted by a rule.
///
/// Immutable once built: fields are only reachable through getters. The
/// builder methods consume the message and are meant for the rule that
/// creates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorMessage {
    severity: Severity,
    text: String,
    rule_id: Option<String>,
    context: Option<MessageContext>,
}

impl ValidatorMessage {
    /// Create an untagged message.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            rule_id: None,
            context: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self::new(Severity::Warn, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    /// Attach the offending object or term.
    #[must_use]
    pub fn with_context(mut self, context: MessageContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attribute the message to a rule.
    #[must_use]
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Attribute the message to `rule_id` unless it already names a rule.
    #[must_use]
    pub fn tagged(self, rule_id: &str) -> Self {
        if self.rule_id.is_some() {
            self
        } else {
            self.with_rule_id(rule_id)
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rule_id(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }

    pub fn context(&self) -> Option<&MessageContext> {
        self.context.as_ref()
    }
}

impl std::fmt::Display for ValidatorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.rule_id {
            Some(rule_id) => write!(f, "[{}] {}: {}", self.severity.label(), rule_id, self.text),
            None => write!(f, "[{}] {}", self.severity.label(), self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn tagged_keeps_existing_rule_id() {
        let message = ValidatorMessage::error("bad").with_rule_id("FIRST");
        assert_eq!(message.tagged("SECOND").rule_id(), Some("FIRST"));
        assert_eq!(
            ValidatorMessage::error("bad").tagged("SECOND").rule_id(),
            Some("SECOND")
        );
    }
}
