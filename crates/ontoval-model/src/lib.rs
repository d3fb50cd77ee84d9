//! Data model shared by the ontology layer and the validation engine.
//!
//! - [`Subject`]: what gets validated (a data object or an ontology term)
//! - [`OntologyTerm`]: a controlled-vocabulary term, consumed read-only
//! - [`ValidatorMessage`]: one finding emitted by a rule

pub mod message;
pub mod subject;
pub mod term;

pub use message::{MessageContext, Severity, ValidatorMessage};
pub use subject::{DataObject, FieldValue, Subject, TermRef};
pub use term::OntologyTerm;
