//! One named ontology: terms plus their `is_a` hierarchy.
//!
//! # Graph Shape
//!
//! Edges point from a child term to each of its parents. Both directions
//! are indexed so ancestor and descendant walks cost the same.
//!
//! ```text
//! MI:0407 (direct interaction)
//!    └─is_a─▶ MI:0915 (physical association)
//!                └─is_a─▶ MI:0914 (association)
//! ```
//!
//! Loaded graphs are not guaranteed to be well formed. Edges may name
//! parents the graph never defines, and cycles are possible. Every query in
//! this crate tolerates both.

use std::collections::{BTreeMap, BTreeSet};

use ontoval_model::OntologyTerm;
use serde::{Deserialize, Serialize};

use crate::walk::TermWalk;

/// A single loaded ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GraphDocument", into = "GraphDocument")]
pub struct OntologyGraph {
    name: String,
    terms: BTreeMap<String, OntologyTerm>,
    parents: BTreeMap<String, BTreeSet<String>>,
    children: BTreeMap<String, BTreeSet<String>>,
}

impl OntologyGraph {
    /// Start building a graph for the ontology `name`.
    pub fn builder(name: impl Into<String>) -> OntologyGraphBuilder {
        OntologyGraphBuilder::new(name)
    }

    /// Ontology name (e.g. "MI", "GO").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check if the graph defines `term_id`.
    pub fn contains(&self, term_id: &str) -> bool {
        self.terms.contains_key(term_id)
    }

    /// Term metadata by accession.
    pub fn term(&self, term_id: &str) -> Option<&OntologyTerm> {
        self.terms.get(term_id)
    }

    /// All terms, sorted by accession.
    pub fn terms(&self) -> impl Iterator<Item = &OntologyTerm> {
        self.terms.values()
    }

    /// Find a term by preferred name or synonym (case-insensitive).
    ///
    /// Non-obsolete terms win over obsolete ones sharing the same label.
    pub fn find_by_label(&self, label: &str) -> Option<&OntologyTerm> {
        let mut fallback = None;
        for term in self.terms.values() {
            if !term.matches_label(label) {
                continue;
            }
            if !term.obsolete {
                return Some(term);
            }
            fallback.get_or_insert(term);
        }
        fallback
    }

    /// Immediate parents of `term_id`, sorted.
    pub fn direct_parents(&self, term_id: &str) -> Vec<&str> {
        neighbours(&self.parents, term_id)
    }

    /// Immediate children of `term_id`, sorted.
    pub fn direct_children(&self, term_id: &str) -> Vec<&str> {
        neighbours(&self.children, term_id)
    }

    /// Terms without parents.
    pub fn roots(&self) -> Vec<&str> {
        self.terms
            .keys()
            .filter(|id| self.parents.get(*id).is_none_or(BTreeSet::is_empty))
            .map(String::as_str)
            .collect()
    }

    /// Lazy breadth-first walk over every ancestor of `term_id`.
    pub fn ancestors<'a>(&'a self, term_id: &str) -> TermWalk<'a> {
        TermWalk::new(&self.parents, term_id)
    }

    /// Lazy breadth-first walk over every descendant of `term_id`.
    pub fn descendants<'a>(&'a self, term_id: &str) -> TermWalk<'a> {
        TermWalk::new(&self.children, term_id)
    }

    /// True iff an `is_a` path leads from `term_id` up to `ancestor_id`.
    ///
    /// A term is only its own descendant when a cycle leads back to it.
    pub fn is_descendant_of(&self, term_id: &str, ancestor_id: &str) -> bool {
        self.ancestors(term_id).any(|id| id == ancestor_id)
    }
}

fn neighbours<'a>(edges: &'a BTreeMap<String, BTreeSet<String>>, term_id: &str) -> Vec<&'a str> {
    edges
        .get(term_id)
        .map(|ids| ids.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Builder for [`OntologyGraph`].
///
/// # Example
///
/// ```
/// use ontoval_ontology::OntologyGraph;
///
/// let graph = OntologyGraph::builder("MI")
///     .term("MI:0914", "association")
///     .term("MI:0915", "physical association")
///     .term("MI:0407", "direct interaction")
///     .is_a("MI:0915", "MI:0914")
///     .is_a("MI:0407", "MI:0915")
///     .build();
///
/// assert!(graph.is_descendant_of("MI:0407", "MI:0914"));
/// assert!(!graph.is_descendant_of("MI:0914", "MI:0407"));
/// ```
#[derive(Debug, Clone)]
pub struct OntologyGraphBuilder {
    name: String,
    terms: BTreeMap<String, OntologyTerm>,
    edges: Vec<(String, String)>,
}

impl OntologyGraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            terms: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    /// Define a term. Redefining an accession replaces the earlier entry.
    #[must_use]
    pub fn term(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let term = OntologyTerm::new(self.name.clone(), id, name);
        self.terms.insert(term.id.clone(), term);
        self
    }

    /// Define a term flagged as obsolete.
    #[must_use]
    pub fn obsolete_term(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut term = OntologyTerm::new(self.name.clone(), id, name);
        term.obsolete = true;
        self.terms.insert(term.id.clone(), term);
        self
    }

    /// Add a synonym to an already defined term. Unknown ids are ignored.
    #[must_use]
    pub fn synonym(mut self, id: &str, synonym: impl Into<String>) -> Self {
        if let Some(term) = self.terms.get_mut(id) {
            term.synonyms.push(synonym.into());
        }
        self
    }

    /// Declare `child is_a parent`.
    #[must_use]
    pub fn is_a(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.edges.push((child.into(), parent.into()));
        self
    }

    pub fn build(self) -> OntologyGraph {
        let mut parents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut children: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (child, parent) in self.edges {
            parents
                .entry(child.clone())
                .or_default()
                .insert(parent.clone());
            children.entry(parent).or_default().insert(child);
        }
        let dangling = parents
            .values()
            .flatten()
            .filter(|id| !self.terms.contains_key(*id))
            .count();
        if dangling > 0 {
            tracing::debug!(
                ontology = %self.name,
                dangling,
                "is_a edges reference undefined terms"
            );
        }
        OntologyGraph {
            name: self.name,
            terms: self.terms,
            parents,
            children,
        }
    }
}

/// Serialized form of a graph: a flat term list with parent accessions.
///
/// `is_a` edges whose child is not a defined term have no term entry to
/// hang off, so they are kept in `edges`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphDocument {
    name: String,
    #[serde(default)]
    terms: Vec<TermDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeDocument {
    child: String,
    parent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TermDocument {
    id: String,
    name: String,
    #[serde(default)]
    obsolete: bool,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    parents: Vec<String>,
}

impl From<GraphDocument> for OntologyGraph {
    fn from(document: GraphDocument) -> Self {
        let mut builder = OntologyGraphBuilder::new(document.name);
        for term in document.terms {
            builder = if term.obsolete {
                builder.obsolete_term(term.id.clone(), term.name)
            } else {
                builder.term(term.id.clone(), term.name)
            };
            for synonym in term.synonyms {
                builder = builder.synonym(&term.id, synonym);
            }
            for parent in term.parents {
                builder = builder.is_a(term.id.clone(), parent);
            }
        }
        for edge in document.edges {
            builder = builder.is_a(edge.child, edge.parent);
        }
        builder.build()
    }
}

impl From<OntologyGraph> for GraphDocument {
    fn from(graph: OntologyGraph) -> Self {
        let mut parents = graph.parents;
        let terms = graph
            .terms
            .into_values()
            .map(|term| TermDocument {
                parents: parents
                    .remove(&term.id)
                    .map(|ids| ids.into_iter().collect())
                    .unwrap_or_default(),
                id: term.id,
                name: term.name,
                obsolete: term.obsolete,
                synonyms: term.synonyms,
            })
            .collect();
        let edges = parents
            .into_iter()
            .flat_map(|(child, ids)| {
                ids.into_iter().map(move |parent| EdgeDocument {
                    child: child.clone(),
                    parent,
                })
            })
            .collect();
        GraphDocument {
            name: graph.name,
            terms,
            edges,
        }
    }
}
