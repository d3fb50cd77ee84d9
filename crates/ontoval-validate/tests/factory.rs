//! Tests for declarative rule sets and the built-in rule types.

use std::io::Write;

use ontoval_model::{DataObject, FieldValue, Severity, Subject, TermRef, ValidatorMessage};
use ontoval_ontology::{OntologyGraph, OntologySnapshot};
use ontoval_validate::{
    ConfigError, ObjectRule, Parallelism, Rule, RuleContext, RuleDescriptor, RuleError,
    RuleFactory, RuleIdentity, RuleSetConfig, Shape, ValidationEngine,
};

const RULE_SET: &str = r#"{
    "engine": { "parallelism": { "threads": 2 }, "rule_time_budget_ms": 1000 },
    "rules": [
        { "id": "INTERACTOR_NAME", "type": "non_empty_field",
          "params": { "kind": "interactor" } },
        { "id": "DETECTION_METHOD_EXISTS", "type": "term_exists",
          "params": { "ontology": "MI", "kind": "interaction", "field": "detection_method" } },
        { "id": "DETECTION_METHOD", "type": "descendant_of",
          "name": "Detection method branch",
          "params": { "ontology": "MI", "kind": "interaction", "field": "detection_method",
                      "allowed": ["MI:0001"] } }
    ]
}"#;

fn mi_snapshot() -> OntologySnapshot {
    let mi = OntologyGraph::builder("MI")
        .term("MI:0000", "molecular interaction")
        .term("MI:0001", "interaction detection method")
        .term("MI:0045", "experimental interaction detection")
        .term("MI:0018", "two hybrid")
        .term("MI:0190", "interaction type")
        .term("MI:0407", "direct interaction")
        .obsolete_term("MI:0017", "classical fluorescence spectroscopy")
        .is_a("MI:0001", "MI:0000")
        .is_a("MI:0045", "MI:0001")
        .is_a("MI:0018", "MI:0045")
        .is_a("MI:0017", "MI:0045")
        .is_a("MI:0190", "MI:0000")
        .is_a("MI:0407", "MI:0190")
        .build();
    OntologySnapshot::new([mi]).expect("snapshot")
}

fn interaction(method: &str) -> Subject {
    Subject::from(
        DataObject::new("interaction")
            .with_id(format!("EBI-{method}"))
            .with_field("detection_method", TermRef::new("MI", method)),
    )
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn rule_set_parses_engine_settings_and_rules() {
    let config = RuleSetConfig::from_json_str(RULE_SET).unwrap();
    assert_eq!(config.engine.parallelism, Parallelism::Threads(2));
    assert_eq!(config.engine.worker_count(), 2);
    assert_eq!(
        config.engine.rule_time_budget(),
        Some(std::time::Duration::from_secs(1))
    );
    let types: Vec<_> = config.rules.iter().map(|rule| rule.rule_type.as_str()).collect();
    assert_eq!(types, vec!["non_empty_field", "term_exists", "descendant_of"]);
}

#[test]
fn rule_set_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RULE_SET.as_bytes()).unwrap();

    let config = RuleSetConfig::from_path(file.path()).unwrap();
    assert_eq!(config.rules.len(), 3);
}

#[test]
fn missing_and_malformed_files_are_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("rules.json");
    assert!(matches!(
        RuleSetConfig::from_path(&missing),
        Err(ConfigError::ConfigRead { .. })
    ));

    std::fs::write(&missing, "{ not json").unwrap();
    assert!(matches!(
        RuleSetConfig::from_path(&missing),
        Err(ConfigError::ConfigParse { .. })
    ));
}

// ============================================================================
// Factory Tests
// ============================================================================

#[test]
fn builtin_types_are_registered() {
    let factory = RuleFactory::with_builtin_rules();
    assert_eq!(
        factory.rule_types(),
        vec!["descendant_of", "non_empty_field", "term_exists"]
    );
}

#[test]
fn unknown_rule_type_is_rejected() {
    let factory = RuleFactory::with_builtin_rules();
    let Err(err) = factory.create(&RuleDescriptor::new("CUSTOM", "org.example.CustomRule")) else {
        panic!("unknown type was built");
    };
    assert!(matches!(
        err,
        ConfigError::UnknownRuleType { ref rule_id, ref rule_type }
            if rule_id == "CUSTOM" && rule_type == "org.example.CustomRule"
    ));
}

#[test]
fn duplicate_ids_in_a_rule_set_are_rejected() {
    let config = RuleSetConfig::from_json_str(
        r#"{ "rules": [
            { "id": "NAME", "type": "non_empty_field" },
            { "id": "NAME", "type": "non_empty_field", "params": { "field": "short_label" } }
        ] }"#,
    )
    .unwrap();
    let err = RuleFactory::with_builtin_rules().build(&config).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRuleId { ref id } if id == "NAME"));
}

#[test]
fn bad_params_name_the_rule() {
    let descriptor = RuleDescriptor::new("BROKEN", "term_exists")
        .with_params(serde_json::json!({ "field": "detection_method" }));
    let Err(err) = RuleFactory::with_builtin_rules().create(&descriptor) else {
        panic!("rule without an ontology was built");
    };
    assert!(matches!(err, ConfigError::InvalidParams { ref rule_id, .. } if rule_id == "BROKEN"));
}

struct AlwaysInfo {
    identity: RuleIdentity,
    shapes: Vec<Shape>,
}

impl Rule for AlwaysInfo {
    fn id(&self) -> &str {
        &self.identity.id
    }

    fn name(&self) -> &str {
        &self.identity.name
    }

    fn description(&self) -> &str {
        &self.identity.description
    }
}

impl ObjectRule for AlwaysInfo {
    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn check(
        &self,
        _subject: &Subject,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<ValidatorMessage>, RuleError> {
        Ok(vec![ctx.message(Severity::Info, "seen")])
    }
}

#[test]
fn custom_types_can_be_registered_once() {
    let mut factory = RuleFactory::new();
    factory
        .register_type("always_info", |descriptor| {
            Ok(Box::new(AlwaysInfo {
                identity: RuleIdentity::from_descriptor(descriptor, "Always info", String::new()),
                shapes: vec![Shape::AnyObject],
            }) as Box<dyn ObjectRule>)
        })
        .unwrap();
    let err = factory
        .register_type("always_info", |descriptor| {
            Err(ConfigError::InvalidParams {
                rule_id: descriptor.id.clone(),
                message: "never built".to_string(),
            })
        })
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateRuleType { .. }));

    let rule = factory
        .create(&RuleDescriptor::new("INFO", "always_info"))
        .unwrap();
    assert_eq!(rule.id(), "INFO");
    assert_eq!(rule.name(), "Always info");
}

// ============================================================================
// Built-in Rule Tests
// ============================================================================

#[test]
fn builtin_rule_set_validates_interactions() {
    let config = RuleSetConfig::from_json_str(RULE_SET).unwrap();
    let registry = RuleFactory::with_builtin_rules().build(&config).unwrap();
    assert_eq!(
        registry.get("DETECTION_METHOD").map(|rule| rule.name()),
        Some("Detection method branch")
    );
    let engine = ValidationEngine::with_config(registry, mi_snapshot(), config.engine).unwrap();

    let subjects = vec![
        interaction("MI:0018"),
        interaction("MI:0407"),
        interaction("MI:9999"),
        interaction("MI:0017"),
        Subject::from(DataObject::new("interactor").with_field("name", "")),
    ];
    let result = engine.validate(&subjects);

    assert!(result.failures.is_empty());
    let found: Vec<_> = result
        .messages
        .iter()
        .map(|message| (message.rule_id().unwrap(), message.severity()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("DETECTION_METHOD", Severity::Error),
            ("DETECTION_METHOD_EXISTS", Severity::Error),
            ("DETECTION_METHOD_EXISTS", Severity::Warn),
            ("INTERACTOR_NAME", Severity::Error),
        ]
    );
    assert_eq!(result.messages[3].text(), "name must not be empty");
}

#[test]
fn term_rules_check_term_lists_and_bare_terms() {
    let config = RuleSetConfig::from_json_str(
        r#"{ "rules": [
            { "id": "TYPE", "type": "descendant_of",
              "params": { "ontology": "MI", "field": "types", "allowed": ["MI:0190"] } }
        ] }"#,
    )
    .unwrap();
    let registry = RuleFactory::with_builtin_rules().build(&config).unwrap();
    let engine = ValidationEngine::new(registry, mi_snapshot()).unwrap();

    let listed = Subject::from(DataObject::new("interaction").with_field(
        "types",
        FieldValue::List(vec![
            TermRef::new("MI", "MI:0407").into(),
            TermRef::new("MI", "MI:0018").into(),
        ]),
    ));
    assert_eq!(engine.validate_one(&listed).error_count(), 1);
    assert!(engine.validate_one(&Subject::from(TermRef::new("MI", "MI:0407"))).is_clean());
    assert!(engine.validate_one(&Subject::from(TermRef::new("GO", "GO:0005634"))).is_clean());
}

#[test]
fn term_rules_require_their_ontology() {
    let config = RuleSetConfig::from_json_str(
        r#"{ "rules": [ { "id": "GO_EXISTS", "type": "term_exists", "params": { "ontology": "GO" } } ] }"#,
    )
    .unwrap();
    let registry = RuleFactory::with_builtin_rules().build(&config).unwrap();
    let err = ValidationEngine::new(registry, mi_snapshot()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingOntology { ref ontology, .. } if ontology == "GO"));
}

#[test]
fn misspelled_allowed_root_fails_engine_construction() {
    let config = RuleSetConfig::from_json_str(
        r#"{ "rules": [
            { "id": "METHOD", "type": "descendant_of",
              "params": { "ontology": "MI", "field": "detection_method",
                          "allowed": ["MI:0045", "MI:0O01"] } }
        ] }"#,
    )
    .unwrap();
    let registry = RuleFactory::with_builtin_rules().build(&config).unwrap();
    let err = ValidationEngine::new(registry, mi_snapshot()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownTerm { ref rule_id, ref ontology, ref term_id }
            if rule_id == "METHOD" && ontology == "MI" && term_id == "MI:0O01"
    ));
    assert_eq!(
        err.to_string(),
        "Rule METHOD refers to term MI:0O01, which ontology 'MI' does not define"
    );
}
