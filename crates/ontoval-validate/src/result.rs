//! Outcome of a validation pass.

use ontoval_model::{Severity, ValidatorMessage};

use crate::error::{FailureKind, RuleError};

/// One rule that could not evaluate one subject.
#[derive(Debug)]
pub struct RuleFailure {
    pub rule_id: String,
    /// Position of the subject in the validated input.
    pub subject_index: usize,
    pub error: RuleError,
}

impl RuleFailure {
    pub fn new(rule_id: impl Into<String>, subject_index: usize, error: RuleError) -> Self {
        Self {
            rule_id: rule_id.into(),
            subject_index,
            error,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

impl std::fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rule {} failed on subject {}: {}",
            self.rule_id, self.subject_index, self.error
        )
    }
}

/// Messages and failures collected over one pass.
///
/// Messages are ordered by subject, then by rule registration order, then
/// by the order each rule emitted them. Failures follow the same order.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub messages: Vec<ValidatorMessage>,
    pub failures: Vec<RuleFailure>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// No messages and no failures.
    pub fn is_clean(&self) -> bool {
        self.messages.is_empty() && self.failures.is_empty()
    }

    /// Check if any message is an error.
    pub fn has_errors(&self) -> bool {
        self.count_severity(Severity::Error) > 0
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warn)
    }

    pub fn info_count(&self) -> usize {
        self.count_severity(Severity::Info)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|message| message.severity() == severity)
            .count()
    }

    /// Highest message severity, `None` when there are no messages.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.messages.iter().map(ValidatorMessage::severity).max()
    }

    pub fn messages_for_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a ValidatorMessage> + 'a {
        self.messages
            .iter()
            .filter(move |message| message.rule_id() == Some(rule_id))
    }

    pub fn failures_for_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a RuleFailure> + 'a {
        self.failures
            .iter()
            .filter(move |failure| failure.rule_id == rule_id)
    }

    /// Check if any rule failed on an ontology lookup.
    ///
    /// Usually means the ontology setup is incomplete rather than the data
    /// being wrong.
    pub fn has_resolver_failures(&self) -> bool {
        self.failures.iter().any(|failure| failure.error.is_resolver())
    }

    /// Append another result, keeping both orders.
    pub fn merge(&mut self, other: ValidationResult) {
        self.messages.extend(other.messages);
        self.failures.extend(other.failures);
    }
}
