//! Pluggable, ontology-aware validation.
//!
//! Rules are registered in a [`RuleRegistry`], either directly or from a
//! declarative [`RuleSetConfig`] through a [`RuleFactory`]. A
//! [`ValidationEngine`] then applies every applicable rule to every subject
//! and collects [`ValidatorMessage`](ontoval_model::ValidatorMessage)s.
//!
//! # Example
//!
//! ```
//! use ontoval_model::{DataObject, Subject};
//! use ontoval_ontology::OntologySnapshot;
//! use ontoval_validate::{RuleFactory, RuleSetConfig, ValidationEngine};
//!
//! let config = RuleSetConfig::from_json_str(r#"{
//!     "rules": [{ "id": "NonEmptyNameRule", "type": "non_empty_field" }]
//! }"#)?;
//! let registry = RuleFactory::with_builtin_rules().build(&config)?;
//! let engine = ValidationEngine::new(registry, OntologySnapshot::empty())?;
//!
//! let subject = Subject::from(DataObject::new("interactor").with_field("name", ""));
//! let result = engine.validate_one(&subject);
//! assert_eq!(result.messages[0].text(), "name must not be empty");
//! # Ok::<(), ontoval_validate::ConfigError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
mod guard;
pub mod logging;
pub mod registry;
pub mod result;
pub mod rule;
pub mod rules;

pub use config::{EngineConfig, Parallelism, RuleDescriptor, RuleSetConfig};
pub use engine::ValidationEngine;
pub use error::{ConfigError, FailureKind, Result, RuleError};
pub use factory::{RuleConstructor, RuleFactory};
pub use registry::RuleRegistry;
pub use result::{RuleFailure, ValidationResult};
pub use rule::{ObjectRule, Rule, RuleContext, RuleIdentity, Shape};
