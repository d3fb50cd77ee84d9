//! Term references must sit under one of the allowed parent terms.

use ontoval_model::{Severity, Subject, TermRef, ValidatorMessage};
use ontoval_ontology::TermResolver;
use serde::Deserialize;

use crate::config::RuleDescriptor;
use crate::error::{ConfigError, Result, RuleError};
use crate::rule::{ObjectRule, Rule, RuleContext, RuleIdentity, Shape};

use super::{TermTarget, parse_severity};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescendantOfParams {
    pub ontology: String,
    pub allowed: Vec<String>,
    #[serde(default)]
    pub include_self: bool,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Checks that every term is a descendant of at least one allowed term.
///
/// Terms the ontology does not know are skipped here; `term_exists`
/// reports those.
#[derive(Debug, Clone)]
pub struct DescendantOfRule {
    identity: RuleIdentity,
    target: TermTarget,
    allowed: Vec<String>,
    include_self: bool,
    severity: Severity,
}

impl DescendantOfRule {
    pub fn new(
        identity: RuleIdentity,
        ontology: impl Into<String>,
        allowed: Vec<String>,
        kind: Option<String>,
        field: Option<String>,
    ) -> Self {
        Self {
            identity,
            target: TermTarget::new(ontology.into(), kind, field),
            allowed,
            include_self: false,
            severity: Severity::Error,
        }
    }

    #[must_use]
    pub fn with_include_self(mut self, enable: bool) -> Self {
        self.include_self = enable;
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn from_descriptor(descriptor: &RuleDescriptor) -> Result<Self> {
        let params: DescendantOfParams = descriptor.params()?;
        if params.allowed.is_empty() {
            return Err(ConfigError::invalid_params(
                &descriptor.id,
                "'allowed' must list at least one term",
            ));
        }
        let severity = parse_severity(&descriptor.id, params.severity.as_deref(), Severity::Error)?;
        let identity = RuleIdentity::from_descriptor(
            descriptor,
            "Descendant of",
            format!("Terms must descend from {}", params.allowed.join(", ")),
        );
        Ok(Self::new(
            identity,
            params.ontology,
            params.allowed,
            params.kind,
            params.field,
        )
        .with_include_self(params.include_self)
        .with_severity(severity))
    }

    fn is_allowed(
        &self,
        resolver: &impl TermResolver,
        term: &TermRef,
    ) -> std::result::Result<bool, RuleError> {
        for allowed in &self.allowed {
            if self.include_self && term.term_id == *allowed {
                return Ok(true);
            }
            if resolver.is_descendant_of(&term.ontology, &term.term_id, allowed)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Rule for DescendantOfRule {
    fn id(&self) -> &str {
        &self.identity.id
    }

    fn name(&self) -> &str {
        &self.identity.name
    }

    fn description(&self) -> &str {
        &self.identity.description
    }

    fn required_ontologies(&self) -> Vec<String> {
        vec![self.target.ontology.clone()]
    }

    fn required_terms(&self) -> Vec<TermRef> {
        self.allowed
            .iter()
            .map(|term_id| TermRef::new(self.target.ontology.as_str(), term_id.as_str()))
            .collect()
    }
}

impl ObjectRule for DescendantOfRule {
    fn shapes(&self) -> &[Shape] {
        &self.target.shapes
    }

    fn can_check(&self, subject: &Subject) -> bool {
        !self.target.terms(subject).is_empty()
    }

    fn check(
        &self,
        subject: &Subject,
        ctx: &RuleContext<'_>,
    ) -> std::result::Result<Vec<ValidatorMessage>, RuleError> {
        let resolver = ctx.ontology();
        let mut messages = Vec::new();
        for term in self.target.terms(subject) {
            if !resolver.term_exists(&term.ontology, &term.term_id)? {
                continue;
            }
            if self.is_allowed(resolver, term)? {
                continue;
            }
            messages.push(
                ctx.message(
                    self.severity,
                    format!(
                        "Term {} is not a descendant of {}",
                        term.term_id,
                        self.allowed.join(" or ")
                    ),
                )
                .with_context(ctx.context_for(subject)),
            );
        }
        Ok(messages)
    }
}
