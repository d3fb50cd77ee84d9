//! Rule factory: rule type tags mapped to constructors.
//!
//! Rules are built from [`RuleDescriptor`]s at configuration-load time. Every
//! rule type is registered up front under a tag; there is no runtime lookup
//! by type name beyond this table.

use std::collections::BTreeMap;

use crate::config::{RuleDescriptor, RuleSetConfig};
use crate::error::{ConfigError, Result};
use crate::registry::RuleRegistry;
use crate::rule::ObjectRule;
use crate::rules;

/// Builds one rule from its descriptor.
pub type RuleConstructor =
    Box<dyn Fn(&RuleDescriptor) -> Result<Box<dyn ObjectRule>> + Send + Sync>;

/// Table of rule constructors keyed by type tag.
#[derive(Default)]
pub struct RuleFactory {
    constructors: BTreeMap<String, RuleConstructor>,
}

impl RuleFactory {
    /// An empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory preloaded with the built-in rule types.
    pub fn with_builtin_rules() -> Self {
        let mut factory = Self::new();
        for (rule_type, constructor) in rules::builtin_constructors() {
            factory.constructors.insert(rule_type.to_string(), constructor);
        }
        factory
    }

    /// Register a constructor for `rule_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRuleType`] if the tag is taken.
    pub fn register_type<F>(&mut self, rule_type: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&RuleDescriptor) -> Result<Box<dyn ObjectRule>> + Send + Sync + 'static,
    {
        let rule_type = rule_type.into();
        if self.constructors.contains_key(&rule_type) {
            return Err(ConfigError::DuplicateRuleType { rule_type });
        }
        self.constructors.insert(rule_type, Box::new(constructor));
        Ok(())
    }

    /// Registered type tags, sorted.
    pub fn rule_types(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Build one rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRuleType`] for unregistered tags, or the
    /// constructor's own error for bad parameters.
    pub fn create(&self, descriptor: &RuleDescriptor) -> Result<Box<dyn ObjectRule>> {
        let constructor = self.constructors.get(&descriptor.rule_type).ok_or_else(|| {
            ConfigError::UnknownRuleType {
                rule_id: descriptor.id.clone(),
                rule_type: descriptor.rule_type.clone(),
            }
        })?;
        constructor(descriptor)
    }

    /// Build a registry from a rule set, in document order.
    ///
    /// # Errors
    ///
    /// Fails on the first rule that cannot be built or whose id is taken.
    pub fn build(&self, config: &RuleSetConfig) -> Result<RuleRegistry> {
        let mut registry = RuleRegistry::new();
        for descriptor in &config.rules {
            registry.register(self.create(descriptor)?)?;
        }
        tracing::info!(rules = registry.len(), "rule registry built");
        Ok(registry)
    }
}

impl std::fmt::Debug for RuleFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleFactory")
            .field("rule_types", &self.rule_types())
            .finish()
    }
}
