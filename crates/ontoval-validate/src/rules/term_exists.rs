//! Term references must resolve in their ontology.

use ontoval_model::{Severity, Subject, ValidatorMessage};
use ontoval_ontology::TermResolver;
use serde::Deserialize;

use crate::config::RuleDescriptor;
use crate::error::{Result, RuleError};
use crate::rule::{ObjectRule, Rule, RuleContext, RuleIdentity, Shape};

use super::TermTarget;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermExistsParams {
    pub ontology: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    /// Report obsolete terms as warnings.
    #[serde(default = "default_flag_obsolete")]
    pub flag_obsolete: bool,
}

fn default_flag_obsolete() -> bool {
    true
}

/// Reports term references that are unknown (error) or obsolete (warning).
#[derive(Debug, Clone)]
pub struct TermExistsRule {
    identity: RuleIdentity,
    target: TermTarget,
    flag_obsolete: bool,
}

impl TermExistsRule {
    pub fn new(
        identity: RuleIdentity,
        ontology: impl Into<String>,
        kind: Option<String>,
        field: Option<String>,
    ) -> Self {
        Self {
            identity,
            target: TermTarget::new(ontology.into(), kind, field),
            flag_obsolete: true,
        }
    }

    #[must_use]
    pub fn with_flag_obsolete(mut self, enable: bool) -> Self {
        self.flag_obsolete = enable;
        self
    }

    pub fn from_descriptor(descriptor: &RuleDescriptor) -> Result<Self> {
        let params: TermExistsParams = descriptor.params()?;
        let identity = RuleIdentity::from_descriptor(
            descriptor,
            "Term exists",
            format!("Terms must exist in ontology {}", params.ontology),
        );
        Ok(
            Self::new(identity, params.ontology, params.kind, params.field)
                .with_flag_obsolete(params.flag_obsolete),
        )
    }
}

impl Rule for TermExistsRule {
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
}

impl ObjectRule for TermExistsRule {
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
        let mut messages = Vec::new();
        for term_ref in self.target.terms(subject) {
            match ctx.ontology().resolve(term_ref)? {
                None => messages.push(
                    ctx.message(
                        Severity::Error,
                        format!("Unknown term {} in ontology {}", term_ref.term_id, term_ref.ontology),
                    )
                    .with_context(ctx.context_for(subject)),
                ),
                Some(term) if term.obsolete && self.flag_obsolete => messages.push(
                    ctx.message(
                        Severity::Warn,
                        format!("Term {} ({}) is obsolete", term.id, term.name),
                    )
                    .with_context(ctx.context_for(subject)),
                ),
                Some(_) => {}
            }
        }
        Ok(messages)
    }
}
