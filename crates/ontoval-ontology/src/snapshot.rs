//! Read-only set of loaded ontologies shared by every rule invocation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ResolverError, Result};
use crate::graph::OntologyGraph;
use crate::resolver::TermResolver;

/// Immutable collection of ontology graphs, keyed by ontology name.
///
/// Cloning is cheap (the graphs sit behind an `Arc`), so one snapshot can be
/// handed to many engines or worker threads. Nothing can mutate a snapshot
/// after construction; tests build their own fixture snapshots instead of
/// touching shared state.
///
/// # Example
///
/// ```
/// use ontoval_ontology::{OntologyGraph, OntologySnapshot, TermResolver};
///
/// let mi = OntologyGraph::builder("MI")
///     .term("MI:0001", "interaction detection method")
///     .term("MI:0018", "two hybrid")
///     .is_a("MI:0018", "MI:0001")
///     .build();
/// let snapshot = OntologySnapshot::new([mi]).unwrap();
///
/// assert!(snapshot.term_exists("MI", "MI:0018").unwrap());
/// assert!(snapshot.is_descendant_of("MI", "MI:0018", "MI:0001").unwrap());
/// assert!(snapshot.term_exists("GO", "GO:0005634").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OntologySnapshot {
    graphs: Arc<BTreeMap<String, OntologyGraph>>,
}

impl OntologySnapshot {
    /// Build a snapshot from loaded graphs.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::DuplicateOntology`] if two graphs share a name.
    pub fn new(graphs: impl IntoIterator<Item = OntologyGraph>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for graph in graphs {
            let name = graph.name().to_string();
            if by_name.contains_key(&name) {
                return Err(ResolverError::DuplicateOntology { name });
            }
            tracing::debug!(ontology = %name, terms = graph.len(), "ontology added to snapshot");
            by_name.insert(name, graph);
        }
        Ok(Self {
            graphs: Arc::new(by_name),
        })
    }

    /// A snapshot holding no ontologies.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names of the loaded ontologies, sorted.
    pub fn ontology_names(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl TermResolver for OntologySnapshot {
    fn has_ontology(&self, name: &str) -> bool {
        self.graphs.contains_key(name)
    }

    fn graph(&self, ontology: &str) -> Result<&OntologyGraph> {
        self.graphs
            .get(ontology)
            .ok_or_else(|| ResolverError::UnknownOntology {
                name: ontology.to_string(),
            })
    }
}
