//! Error types for ontology lookups.

use thiserror::Error;

/// Errors raised when a lookup names an ontology the snapshot does not hold.
///
/// These are configuration problems, not findings about the validated data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolverError {
    /// The named ontology was never loaded into the snapshot.
    #[error("Ontology not loaded: {name}")]
    UnknownOntology { name: String },

    /// Two graphs with the same name were added to one snapshot.
    #[error("Ontology loaded twice: {name}")]
    DuplicateOntology { name: String },
}

/// Result type for ontology lookups.
pub type Result<T> = std::result::Result<T, ResolverError>;
