use serde::{Deserialize, Serialize};

/// A node in a controlled-vocabulary concept graph.
///
/// Consumed read-only: terms are created when an ontology graph is built and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTerm {
    /// Accession, unique within its ontology (e.g. "MI:0407").
    pub id: String,
    /// Preferred name (e.g. "direct interaction").
    pub name: String,
    /// Name of the ontology that defines this term (e.g. "MI").
    pub ontology_name: String,
    /// Obsolete terms still resolve but should not be used in new data.
    #[serde(default)]
    pub obsolete: bool,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl OntologyTerm {
    pub fn new(
        ontology_name: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ontology_name: ontology_name.into(),
            obsolete: false,
            synonyms: Vec::new(),
        }
    }

    /// Check if `label` is the preferred name or a synonym (case-insensitive).
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.name.eq_ignore_ascii_case(label)
            || self
                .synonyms
                .iter()
                .any(|synonym| synonym.eq_ignore_ascii_case(label))
    }
}
