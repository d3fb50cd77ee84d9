//! Validation subjects.
//!
//! The engine dispatches on [`Subject`]: either a parsed data object or a
//! bare reference to an ontology term. Rules declare which of these shapes
//! they accept, so no runtime type tests are needed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference to a term inside a named ontology (e.g. `MI` / `MI:0407`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermRef {
    pub ontology: String,
    pub term_id: String,
}

impl TermRef {
    pub fn new(ontology: impl Into<String>, term_id: impl Into<String>) -> Self {
        Self {
            ontology: ontology.into(),
            term_id: term_id.into(),
        }
    }
}

impl std::fmt::Display for TermRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ontology, self.term_id)
    }
}

/// A field value inside a [`DataObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Term(TermRef),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&TermRef> {
        match self {
            FieldValue::Term(term) => Some(term),
            _ => None,
        }
    }

    /// Every term reference in this value, descending into lists.
    pub fn terms(&self) -> Vec<&TermRef> {
        match self {
            FieldValue::Term(term) => vec![term],
            FieldValue::List(items) => items.iter().flat_map(FieldValue::terms).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<TermRef> for FieldValue {
    fn from(value: TermRef) -> Self {
        FieldValue::Term(value)
    }
}

/// A parsed domain object (interaction, interactor, experiment, ...).
///
/// `kind` is the type tag rules match on; fields are kept sorted so that
/// iteration order never depends on insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataObject {
    pub kind: String,
    pub id: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl DataObject {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text value of a field, `None` when absent or not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }
}

/// What the engine validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Object(DataObject),
    Term(TermRef),
}

impl Subject {
    pub fn as_object(&self) -> Option<&DataObject> {
        match self {
            Subject::Object(object) => Some(object),
            Subject::Term(_) => None,
        }
    }

    pub fn as_term(&self) -> Option<&TermRef> {
        match self {
            Subject::Term(term) => Some(term),
            Subject::Object(_) => None,
        }
    }

    /// Short description for log output.
    pub fn describe(&self) -> String {
        match self {
            Subject::Object(object) => match &object.id {
                Some(id) => format!("{} {}", object.kind, id),
                None => object.kind.clone(),
            },
            Subject::Term(term) => term.to_string(),
        }
    }
}

impl From<DataObject> for Subject {
    fn from(value: DataObject) -> Self {
        Subject::Object(value)
    }
}

impl From<TermRef> for Subject {
    fn from(value: TermRef) -> Self {
        Subject::Term(value)
    }
}
