//! Term resolution over named ontologies.

use ontoval_model::{OntologyTerm, TermRef};

use crate::error::Result;
use crate::graph::OntologyGraph;
use crate::walk::TermWalk;

/// Structural questions about terms within named ontologies.
///
/// Implementors only supply [`graph`](TermResolver::graph); every query is
/// answered from the returned graph. Asking about an ontology that was never
/// loaded fails with [`ResolverError::UnknownOntology`](crate::ResolverError)
/// instead of answering `false`, so a misconfigured rule cannot pass silently.
pub trait TermResolver {
    /// Check if the ontology `name` is loaded.
    fn has_ontology(&self, name: &str) -> bool;

    /// The loaded graph for `ontology`.
    fn graph(&self, ontology: &str) -> Result<&OntologyGraph>;

    fn term_exists(&self, ontology: &str, term_id: &str) -> Result<bool> {
        Ok(self.graph(ontology)?.contains(term_id))
    }

    /// Term metadata (name, obsolete flag, synonyms).
    fn term(&self, ontology: &str, term_id: &str) -> Result<Option<&OntologyTerm>> {
        Ok(self.graph(ontology)?.term(term_id))
    }

    /// Resolve a [`TermRef`] to its metadata.
    fn resolve(&self, term: &TermRef) -> Result<Option<&OntologyTerm>> {
        self.term(&term.ontology, &term.term_id)
    }

    /// True iff a directed `is_a` path leads from `term_id` up to `ancestor_id`.
    fn is_descendant_of(&self, ontology: &str, term_id: &str, ancestor_id: &str) -> Result<bool> {
        Ok(self.graph(ontology)?.is_descendant_of(term_id, ancestor_id))
    }

    /// Lazy, finite, restartable sequence of ancestor ids.
    fn ancestors<'a>(&'a self, ontology: &str, term_id: &str) -> Result<TermWalk<'a>> {
        Ok(self.graph(ontology)?.ancestors(term_id))
    }

    /// Lazy, finite, restartable sequence of descendant ids.
    fn descendants<'a>(&'a self, ontology: &str, term_id: &str) -> Result<TermWalk<'a>> {
        Ok(self.graph(ontology)?.descendants(term_id))
    }

    fn direct_parents<'a>(&'a self, ontology: &str, term_id: &str) -> Result<Vec<&'a str>> {
        Ok(self.graph(ontology)?.direct_parents(term_id))
    }

    fn direct_children<'a>(&'a self, ontology: &str, term_id: &str) -> Result<Vec<&'a str>> {
        Ok(self.graph(ontology)?.direct_children(term_id))
    }
}
