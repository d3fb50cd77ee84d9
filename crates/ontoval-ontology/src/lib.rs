//! Ontology graphs and term resolution for rule evaluation.
//!
//! This crate provides:
//!
//! - [`OntologyGraph`]: one loaded ontology (terms and `is_a` edges)
//! - [`OntologySnapshot`]: the read-only set of graphs a validation pass uses
//! - [`TermResolver`]: existence, metadata, and ancestor/descendant queries
//!
//! Parsing ontology sources (OBO, OWL) happens elsewhere; graphs arrive here
//! already loaded, either through [`OntologyGraphBuilder`] or by
//! deserializing the flat document form:
//!
//! ```json
//! { "name": "MI", "terms": [ { "id": "MI:0018", "name": "two hybrid", "parents": ["MI:0001"] } ] }
//! ```

pub mod error;
pub mod graph;
pub mod resolver;
pub mod snapshot;
pub mod walk;

pub use error::{ResolverError, Result};
pub use graph::{OntologyGraph, OntologyGraphBuilder};
pub use resolver::TermResolver;
pub use snapshot::OntologySnapshot;
pub use walk::TermWalk;
