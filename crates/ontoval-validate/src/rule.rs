//! Rule contracts.
//!
//! Every rule has an identity ([`Rule`]) and, to take part in dispatch, an
//! evaluation surface ([`ObjectRule`]). A rule declares the subject
//! [`Shape`]s it accepts; the registry only offers it subjects of those
//! shapes, then asks [`ObjectRule::can_check`] for the final say.

use ontoval_model::{MessageContext, Severity, Subject, TermRef, ValidatorMessage};
use ontoval_ontology::OntologySnapshot;

use crate::config::RuleDescriptor;
use crate::error::RuleError;

/// Identity shared by all rules.
pub trait Rule: Send + Sync {
    /// Unique rule identifier (e.g., "INTERACTION_TYPE_MI").
    fn id(&self) -> &str;

    /// Short human-readable name.
    fn name(&self) -> &str;

    /// Longer description of what the rule checks.
    fn description(&self) -> &str;

    /// Ontologies that must be present in the snapshot for this rule to run.
    fn required_ontologies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Terms the rule is configured against, such as hierarchy roots. Each
    /// must be defined in the snapshot.
    fn required_terms(&self) -> Vec<TermRef> {
        Vec::new()
    }
}

/// A subject shape a rule accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Any data object.
    AnyObject,
    /// Data objects with this `kind` tag.
    Object(String),
    /// Any term reference.
    AnyTerm,
    /// Term references into this ontology.
    Term(String),
}

impl Shape {
    /// Object shape, narrowed to `kind` when given.
    pub fn object(kind: Option<&str>) -> Self {
        match kind {
            Some(kind) => Shape::Object(kind.to_string()),
            None => Shape::AnyObject,
        }
    }

    /// Type-tag match against a subject.
    pub fn matches(&self, subject: &Subject) -> bool {
        match (self, subject) {
            (Shape::AnyObject, Subject::Object(_)) => true,
            (Shape::Object(kind), Subject::Object(object)) => object.kind == *kind,
            (Shape::AnyTerm, Subject::Term(_)) => true,
            (Shape::Term(ontology), Subject::Term(term)) => term.ontology == *ontology,
            _ => false,
        }
    }
}

/// A rule that evaluates subjects of the shapes it declares.
pub trait ObjectRule: Rule {
    /// Subject shapes this rule accepts.
    fn shapes(&self) -> &[Shape];

    /// Extra applicability test, called only for subjects matching a shape.
    ///
    /// Must be pure and must not panic; returning `false` skips the subject.
    fn can_check(&self, _subject: &Subject) -> bool {
        true
    }

    /// Evaluate one applicable subject.
    ///
    /// Non-conformance is reported as messages. `Err` is reserved for
    /// conditions that stop the rule from evaluating at all, such as a
    /// missing ontology.
    fn check(
        &self,
        subject: &Subject,
        ctx: &RuleContext<'_>,
    ) -> std::result::Result<Vec<ValidatorMessage>, RuleError>;
}

/// Read-only state handed to every [`ObjectRule::check`] call.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    ontology: &'a OntologySnapshot,
    rule_id: &'a str,
    subject_index: usize,
}

impl<'a> RuleContext<'a> {
    pub fn new(ontology: &'a OntologySnapshot, rule_id: &'a str, subject_index: usize) -> Self {
        Self {
            ontology,
            rule_id,
            subject_index,
        }
    }

    /// The ontology snapshot for this pass.
    pub fn ontology(&self) -> &'a OntologySnapshot {
        self.ontology
    }

    /// Id of the rule being evaluated.
    pub fn rule_id(&self) -> &'a str {
        self.rule_id
    }

    /// Position of the subject in the validated input.
    pub fn subject_index(&self) -> usize {
        self.subject_index
    }

    /// Context pointing at `subject`.
    pub fn context_for(&self, subject: &Subject) -> MessageContext {
        MessageContext::for_subject(subject, self.subject_index)
    }

    /// A message already tagged with the running rule's id.
    pub fn message(&self, severity: Severity, text: impl Into<String>) -> ValidatorMessage {
        ValidatorMessage::new(severity, text).with_rule_id(self.rule_id)
    }
}

/// Id, name, and description of a configured rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleIdentity {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl RuleIdentity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Take identity from a descriptor, falling back to the given defaults.
    pub fn from_descriptor(
        descriptor: &RuleDescriptor,
        default_name: &str,
        default_description: String,
    ) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor
                .name
                .clone()
                .unwrap_or_else(|| default_name.to_string()),
            description: descriptor
                .description
                .clone()
                .unwrap_or(default_description),
        }
    }
}
