//! Error types for rule configuration and rule evaluation.
//!
//! Three kinds of trouble are kept apart:
//!
//! - [`ConfigError`]: the rule set or ontology setup is wrong. Raised before
//!   validation starts and returned straight to the caller.
//! - [`RuleError`]: one rule could not evaluate one subject. The engine
//!   records it as a [`RuleFailure`](crate::RuleFailure) and keeps going.
//! - Findings about the data itself are neither; they are
//!   [`ValidatorMessage`](ontoval_model::ValidatorMessage)s.

use std::path::PathBuf;
use std::time::Duration;

use ontoval_ontology::ResolverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal setup errors: the engine cannot be built.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Two rules share an id within one registry.
    #[error("Duplicate rule id: {id}")]
    DuplicateRuleId { id: String },

    /// Two constructors were registered for the same rule type.
    #[error("Duplicate rule type: {rule_type}")]
    DuplicateRuleType { rule_type: String },

    /// A descriptor names a rule type with no registered constructor.
    #[error("Unknown rule type '{rule_type}' for rule {rule_id}")]
    UnknownRuleType { rule_id: String, rule_type: String },

    /// A descriptor's parameters do not fit its rule type.
    #[error("Invalid parameters for rule {rule_id}: {message}")]
    InvalidParams { rule_id: String, message: String },

    /// A rule needs an ontology the snapshot does not hold.
    #[error("Rule {rule_id} requires ontology '{ontology}', which is not loaded")]
    MissingOntology { rule_id: String, ontology: String },

    /// A rule is configured against a term its ontology does not define.
    #[error("Rule {rule_id} refers to term {term_id}, which ontology '{ontology}' does not define")]
    UnknownTerm {
        rule_id: String,
        ontology: String,
        term_id: String,
    },

    /// Failed to read a rule set file.
    #[error("Failed to read rule set {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a rule set document.
    #[error("Failed to parse rule set: {source}")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid_params(rule_id: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidParams {
            rule_id: rule_id.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for configuration and registry operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why one rule failed on one subject.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The rule asked about an ontology that was never loaded.
    #[error("Ontology lookup failed: {0}")]
    Resolver(#[from] ResolverError),

    /// The rule reported that it cannot evaluate the subject.
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String },

    /// The rule panicked while checking.
    #[error("Rule panicked: {message}")]
    Panicked { message: String },

    /// The rule took longer than the configured per-rule budget.
    #[error("Rule exceeded its time budget ({elapsed:?} > {budget:?})")]
    TimeBudgetExceeded { elapsed: Duration, budget: Duration },

    /// Any other error raised inside a rule, with its cause chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RuleError {
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Resolver(_) => FailureKind::Resolver,
            Self::Evaluation { .. } | Self::Other(_) => FailureKind::Evaluation,
            Self::Panicked { .. } => FailureKind::Panic,
            Self::TimeBudgetExceeded { .. } => FailureKind::TimeBudget,
        }
    }

    /// Check if the failure points at ontology configuration rather than the rule.
    pub fn is_resolver(&self) -> bool {
        matches!(self, Self::Resolver(_))
    }
}

/// Coarse classification of a [`RuleError`], for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Resolver,
    Evaluation,
    Panic,
    TimeBudget,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolver => "Resolver",
            Self::Evaluation => "Evaluation",
            Self::Panic => "Panic",
            Self::TimeBudget => "Time budget",
        }
    }
}
