//! Built-in rule types.
//!
//! | Type tag | Rule |
//! |----------|------|
//! | `non_empty_field` | [`NonEmptyFieldRule`] |
//! | `term_exists` | [`TermExistsRule`] |
//! | `descendant_of` | [`DescendantOfRule`] |

mod descendant;
mod non_empty;
mod term_exists;

pub use descendant::{DescendantOfParams, DescendantOfRule};
pub use non_empty::{NonEmptyFieldParams, NonEmptyFieldRule};
pub use term_exists::{TermExistsParams, TermExistsRule};

use ontoval_model::{Severity, Subject, TermRef};

use crate::config::RuleDescriptor;
use crate::error::{ConfigError, Result};
use crate::factory::RuleConstructor;
use crate::rule::{ObjectRule, Shape};

pub const NON_EMPTY_FIELD: &str = "non_empty_field";
pub const TERM_EXISTS: &str = "term_exists";
pub const DESCENDANT_OF: &str = "descendant_of";

pub(crate) fn builtin_constructors() -> Vec<(&'static str, RuleConstructor)> {
    vec![
        (NON_EMPTY_FIELD, boxed(NonEmptyFieldRule::from_descriptor)),
        (TERM_EXISTS, boxed(TermExistsRule::from_descriptor)),
        (DESCENDANT_OF, boxed(DescendantOfRule::from_descriptor)),
    ]
}

fn boxed<R, F>(constructor: F) -> RuleConstructor
where
    R: ObjectRule + 'static,
    F: Fn(&RuleDescriptor) -> Result<R> + Send + Sync + 'static,
{
    Box::new(
        move |descriptor: &RuleDescriptor| -> Result<Box<dyn ObjectRule>> {
            Ok(Box::new(constructor(descriptor)?))
        },
    )
}

/// Parse an optional severity name from rule parameters.
fn parse_severity(rule_id: &str, value: Option<&str>, default: Severity) -> Result<Severity> {
    match value {
        None => Ok(default),
        Some(name) => Severity::parse(name)
            .ok_or_else(|| ConfigError::invalid_params(rule_id, format!("unknown severity '{name}'"))),
    }
}

/// Where a term rule looks for terms.
///
/// Term subjects of the ontology are always checked. With a `field`, data
/// objects (optionally of one `kind`) are checked too, using the term
/// references held in that field.
#[derive(Debug, Clone)]
struct TermTarget {
    ontology: String,
    kind: Option<String>,
    field: Option<String>,
    shapes: Vec<Shape>,
}

impl TermTarget {
    fn new(ontology: String, kind: Option<String>, field: Option<String>) -> Self {
        let mut shapes = vec![Shape::Term(ontology.clone())];
        if field.is_some() {
            shapes.push(Shape::object(kind.as_deref()));
        }
        Self {
            ontology,
            kind,
            field,
            shapes,
        }
    }

    /// Term references in this target's ontology carried by `subject`.
    fn terms<'s>(&self, subject: &'s Subject) -> Vec<&'s TermRef> {
        match subject {
            Subject::Term(term) if term.ontology == self.ontology => vec![term],
            Subject::Term(_) => Vec::new(),
            Subject::Object(object) => {
                if let Some(kind) = &self.kind
                    && object.kind != *kind
                {
                    return Vec::new();
                }
                self.field
                    .as_deref()
                    .and_then(|field| object.field(field))
                    .map(|value| {
                        value
                            .terms()
                            .into_iter()
                            .filter(|term| term.ontology == self.ontology)
                            .collect()
                    })
                    .unwrap_or_default()
            }
        }
    }
}
