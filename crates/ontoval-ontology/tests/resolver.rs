//! Tests for ontology snapshots and hierarchy queries.

use std::collections::BTreeSet;

use ontoval_model::TermRef;
use ontoval_ontology::{OntologyGraph, OntologySnapshot, ResolverError, TermResolver};
use proptest::prelude::*;

fn mi_graph() -> OntologyGraph {
    OntologyGraph::builder("MI")
        .term("MI:0000", "molecular interaction")
        .term("MI:0001", "interaction detection method")
        .term("MI:0045", "experimental interaction detection")
        .term("MI:0018", "two hybrid")
        .term("MI:0190", "interaction type")
        .term("MI:0407", "direct interaction")
        .obsolete_term("MI:0218", "physical interaction")
        .is_a("MI:0001", "MI:0000")
        .is_a("MI:0045", "MI:0001")
        .is_a("MI:0018", "MI:0045")
        .is_a("MI:0190", "MI:0000")
        .is_a("MI:0407", "MI:0190")
        .build()
}

fn snapshot() -> OntologySnapshot {
    OntologySnapshot::new([mi_graph()]).expect("snapshot")
}

// ============================================================================
// Snapshot Tests
// ============================================================================

#[test]
fn duplicate_ontology_names_are_rejected() {
    let err = OntologySnapshot::new([mi_graph(), mi_graph()]).unwrap_err();
    assert_eq!(
        err,
        ResolverError::DuplicateOntology {
            name: "MI".to_string()
        }
    );
}

#[test]
fn unknown_ontology_is_an_error_not_false() {
    let snapshot = snapshot();
    let err = snapshot.term_exists("GO", "GO:0005634").unwrap_err();
    assert_eq!(
        err,
        ResolverError::UnknownOntology {
            name: "GO".to_string()
        }
    );
    assert!(snapshot.is_descendant_of("GO", "a", "b").is_err());
    assert!(snapshot.ancestors("GO", "a").is_err());
    assert!(!snapshot.has_ontology("GO"));
    assert!(snapshot.has_ontology("MI"));
}

#[test]
fn snapshot_clones_share_graphs() {
    let snapshot = snapshot();
    let clone = snapshot.clone();
    assert_eq!(clone.ontology_names().collect::<Vec<_>>(), vec!["MI"]);
    assert_eq!(clone.len(), 1);
    assert!(OntologySnapshot::empty().is_empty());
}

// ============================================================================
// Term Queries
// ============================================================================

#[test]
fn resolves_term_metadata() {
    let snapshot = snapshot();
    assert!(snapshot.term_exists("MI", "MI:0018").unwrap());
    assert!(!snapshot.term_exists("MI", "MI:9999").unwrap());

    let term = snapshot
        .resolve(&TermRef::new("MI", "MI:0218"))
        .unwrap()
        .expect("term");
    assert_eq!(term.name, "physical interaction");
    assert_eq!(term.ontology_name, "MI");
    assert!(term.obsolete);
}

#[test]
fn descendant_queries_follow_is_a_upwards() {
    let snapshot = snapshot();
    assert!(snapshot.is_descendant_of("MI", "MI:0018", "MI:0001").unwrap());
    assert!(snapshot.is_descendant_of("MI", "MI:0018", "MI:0000").unwrap());
    assert!(!snapshot.is_descendant_of("MI", "MI:0001", "MI:0018").unwrap());
    assert!(!snapshot.is_descendant_of("MI", "MI:0407", "MI:0001").unwrap());
    // strict: a term is not its own descendant
    assert!(!snapshot.is_descendant_of("MI", "MI:0018", "MI:0018").unwrap());
    assert!(!snapshot.is_descendant_of("MI", "MI:9999", "MI:0000").unwrap());
}

#[test]
fn ancestors_are_breadth_first() {
    let snapshot = snapshot();
    let ancestors: Vec<&str> = snapshot.ancestors("MI", "MI:0018").unwrap().collect();
    assert_eq!(ancestors, vec!["MI:0045", "MI:0001", "MI:0000"]);
}

#[test]
fn descendants_walk_children() {
    let snapshot = snapshot();
    let descendants: BTreeSet<&str> = snapshot.descendants("MI", "MI:0000").unwrap().collect();
    let expected: BTreeSet<&str> = ["MI:0001", "MI:0045", "MI:0018", "MI:0190", "MI:0407"]
        .into_iter()
        .collect();
    assert_eq!(descendants, expected);
    assert_eq!(
        snapshot.direct_children("MI", "MI:0000").unwrap(),
        vec!["MI:0001", "MI:0190"]
    );
    assert_eq!(
        snapshot.direct_parents("MI", "MI:0018").unwrap(),
        vec!["MI:0045"]
    );
}

#[test]
fn two_term_cycle_terminates() {
    let graph = OntologyGraph::builder("X")
        .term("term1", "one")
        .term("term2", "two")
        .is_a("term1", "term2")
        .is_a("term2", "term1")
        .build();
    let snapshot = OntologySnapshot::new([graph]).unwrap();
    assert!(snapshot.is_descendant_of("X", "term1", "term2").unwrap());
    assert!(snapshot.is_descendant_of("X", "term2", "term1").unwrap());
    assert!(!snapshot.is_descendant_of("X", "term1", "term3").unwrap());
    assert_eq!(snapshot.ancestors("X", "term1").unwrap().count(), 2);
}

#[test]
fn deserializes_flat_document() {
    let json = r#"{
        "name": "MI",
        "terms": [
            { "id": "MI:0001", "name": "interaction detection method" },
            { "id": "MI:0018", "name": "two hybrid", "synonyms": ["Y2H"], "parents": ["MI:0001"] },
            { "id": "MI:0218", "name": "physical interaction", "obsolete": true }
        ]
    }"#;
    let graph: OntologyGraph = serde_json::from_str(json).unwrap();
    assert_eq!(graph.name(), "MI");
    assert_eq!(graph.len(), 3);
    assert!(graph.is_descendant_of("MI:0018", "MI:0001"));
    assert_eq!(
        graph.find_by_label("y2h").map(|term| term.id.as_str()),
        Some("MI:0018")
    );
    assert!(graph.term("MI:0218").is_some_and(|term| term.obsolete));
}

#[test]
fn edges_from_undefined_terms_survive_serialization() {
    let graph = OntologyGraph::builder("MI")
        .term("MI:0001", "interaction detection method")
        .term("MI:0018", "two hybrid")
        .is_a("MI:0018", "MI:0001")
        .is_a("MI:0500", "MI:0001")
        .build();

    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(
        json["edges"],
        serde_json::json!([{ "child": "MI:0500", "parent": "MI:0001" }])
    );

    let restored: OntologyGraph = serde_json::from_value(json).unwrap();
    assert_eq!(restored.len(), 2);
    assert!(restored.is_descendant_of("MI:0500", "MI:0001"));
    assert!(restored.is_descendant_of("MI:0018", "MI:0001"));
    assert_eq!(restored.direct_children("MI:0001"), vec!["MI:0018", "MI:0500"]);
}

// ============================================================================
// Properties
// ============================================================================

/// Reachability by repeated relaxation, used as the oracle.
fn reachable(edges: &[(u8, u8)], from: u8) -> BTreeSet<u8> {
    let mut seen = BTreeSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for (child, parent) in edges {
            if (*child == from || seen.contains(child)) && seen.insert(*parent) {
                changed = true;
            }
        }
    }
    seen
}

fn graph_from(edges: &[(u8, u8)]) -> OntologyGraph {
    let mut builder = OntologyGraph::builder("P");
    for id in 0..8u8 {
        builder = builder.term(format!("t{id}"), format!("term {id}"));
    }
    for (child, parent) in edges {
        builder = builder.is_a(format!("t{child}"), format!("t{parent}"));
    }
    builder.build()
}

proptest! {
    #[test]
    fn descendant_matches_reachability(
        edges in prop::collection::vec((0u8..8, 0u8..8), 0..24),
        from in 0u8..8,
        to in 0u8..8,
    ) {
        let graph = graph_from(&edges);
        let expected = reachable(&edges, from).contains(&to);
        prop_assert_eq!(
            graph.is_descendant_of(&format!("t{from}"), &format!("t{to}")),
            expected
        );
    }

    #[test]
    fn ancestors_are_unique_and_restartable(
        edges in prop::collection::vec((0u8..8, 0u8..8), 0..24),
        from in 0u8..8,
    ) {
        let graph = graph_from(&edges);
        let start = format!("t{from}");
        let first: Vec<&str> = graph.ancestors(&start).collect();
        let second: Vec<&str> = graph.ancestors(&start).collect();
        prop_assert_eq!(&first, &second);
        let unique: BTreeSet<&str> = first.iter().copied().collect();
        prop_assert_eq!(unique.len(), first.len());
        prop_assert_eq!(unique.len(), reachable(&edges, from).len());
    }
}
