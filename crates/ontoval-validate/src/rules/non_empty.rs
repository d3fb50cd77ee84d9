//! Required text fields must not be blank.

use ontoval_model::{Severity, Subject, ValidatorMessage};
use serde::Deserialize;

use crate::config::RuleDescriptor;
use crate::error::{Result, RuleError};
use crate::rule::{ObjectRule, Rule, RuleContext, RuleIdentity, Shape};

use super::parse_severity;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NonEmptyFieldParams {
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

fn default_field() -> String {
    "name".to_string()
}

/// Flags objects whose `field` is present but blank.
///
/// Objects without the field are not checked at all; pair this rule with a
/// presence check if the field is mandatory.
#[derive(Debug, Clone)]
pub struct NonEmptyFieldRule {
    identity: RuleIdentity,
    field: String,
    severity: Severity,
    shapes: Vec<Shape>,
}

impl NonEmptyFieldRule {
    pub fn new(identity: RuleIdentity, field: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            identity,
            field: field.into(),
            severity: Severity::Error,
            shapes: vec![Shape::object(kind)],
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn from_descriptor(descriptor: &RuleDescriptor) -> Result<Self> {
        let params: NonEmptyFieldParams = descriptor.params()?;
        let severity = parse_severity(&descriptor.id, params.severity.as_deref(), Severity::Error)?;
        let identity = RuleIdentity::from_descriptor(
            descriptor,
            "Non-empty field",
            format!("Field '{}' must not be empty", params.field),
        );
        Ok(Self::new(identity, params.field, params.kind.as_deref()).with_severity(severity))
    }
}

impl Rule for NonEmptyFieldRule {
    fn id(&self) -> &str {
        &self.identity.id
    }

    fn name(&self) -> &str {
        &self.identity.name
    }

    fn description(&self) -> &str {
        &self.identity.description
    }
}

impl ObjectRule for NonEmptyFieldRule {
    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn can_check(&self, subject: &Subject) -> bool {
        subject
            .as_object()
            .is_some_and(|object| object.has_field(&self.field))
    }

    fn check(
        &self,
        subject: &Subject,
        ctx: &RuleContext<'_>,
    ) -> std::result::Result<Vec<ValidatorMessage>, RuleError> {
        let Some(object) = subject.as_object() else {
            return Ok(Vec::new());
        };
        let blank = object
            .field(&self.field)
            .is_none_or(|value| value.as_text().is_some_and(|text| text.trim().is_empty()));
        if !blank {
            return Ok(Vec::new());
        }
        Ok(vec![
            ctx.message(self.severity, format!("{} must not be empty", self.field))
                .with_context(ctx.context_for(subject)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoval_model::DataObject;
    use ontoval_ontology::OntologySnapshot;

    fn rule() -> NonEmptyFieldRule {
        let descriptor = RuleDescriptor::new("NAME", "non_empty_field")
            .with_params(serde_json::json!({ "kind": "interactor" }));
        NonEmptyFieldRule::from_descriptor(&descriptor).unwrap()
    }

    #[test]
    fn defaults_to_name_field_and_error() {
        let rule = rule();
        assert_eq!(rule.field, "name");
        assert_eq!(rule.severity, Severity::Error);
        assert_eq!(rule.shapes(), &[Shape::Object("interactor".to_string())]);
    }

    #[test]
    fn blank_text_is_flagged() {
        let rule = rule();
        let snapshot = OntologySnapshot::empty();
        let ctx = RuleContext::new(&snapshot, rule.id(), 0);

        let blank = Subject::from(DataObject::new("interactor").with_field("name", "  "));
        let messages = rule.check(&blank, &ctx).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "name must not be empty");

        let named = Subject::from(DataObject::new("interactor").with_field("name", "P12345"));
        assert!(rule.check(&named, &ctx).unwrap().is_empty());
    }

    #[test]
    fn objects_without_the_field_are_skipped() {
        let rule = rule();
        assert!(!rule.can_check(&Subject::from(DataObject::new("interactor"))));
    }

    #[test]
    fn unknown_params_are_rejected() {
        let descriptor = RuleDescriptor::new("NAME", "non_empty_field")
            .with_params(serde_json::json!({ "fields": "name" }));
        assert!(NonEmptyFieldRule::from_descriptor(&descriptor).is_err());
    }
}
