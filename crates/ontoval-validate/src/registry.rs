//! Registry of configured rules.

use std::collections::{BTreeSet, HashMap};

use ontoval_model::Subject;

use crate::error::{ConfigError, Result, RuleError};
use crate::guard::guarded;
use crate::rule::{ObjectRule, Rule};

/// The configured rule set, in registration order.
///
/// Rule ids are unique; rules may overlap freely, and several rules can
/// apply to the same subject.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn ObjectRule>>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRuleId`] if a rule with the same id is
    /// already registered; the registry is left unchanged.
    pub fn register(&mut self, rule: Box<dyn ObjectRule>) -> Result<()> {
        let id = rule.id().to_string();
        if self.index.contains_key(&id) {
            return Err(ConfigError::DuplicateRuleId { id });
        }
        tracing::debug!(rule_id = %id, "rule registered");
        self.index.insert(id, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Add several rules, stopping at the first duplicate id.
    pub fn register_all(
        &mut self,
        rules: impl IntoIterator<Item = Box<dyn ObjectRule>>,
    ) -> Result<()> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn ObjectRule> {
        self.index.get(id).map(|&position| self.rules[position].as_ref())
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ObjectRule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Rule ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|rule| rule.id()).collect()
    }

    /// Rules whose shapes match `subject`, each paired with its `can_check`
    /// verdict, in registration order.
    ///
    /// A panicking `can_check` yields [`RuleError::Panicked`] instead of
    /// unwinding into the caller.
    pub fn candidates<'r, 's>(
        &'r self,
        subject: &'s Subject,
    ) -> impl Iterator<Item = (&'r dyn ObjectRule, std::result::Result<bool, RuleError>)> + use<'r, 's>
    {
        self.iter()
            .filter(move |rule| rule.shapes().iter().any(|shape| shape.matches(subject)))
            .map(move |rule| (rule, guarded(|| rule.can_check(subject))))
    }

    /// Rules applicable to `subject`, in registration order.
    ///
    /// A rule applies when one of its shapes matches and `can_check` returns
    /// `true`. A rule whose `can_check` panics does not apply.
    pub fn applicable_rules(&self, subject: &Subject) -> Vec<&dyn ObjectRule> {
        self.candidates(subject)
            .filter_map(|(rule, applies)| match applies {
                Ok(true) => Some(rule),
                Ok(false) => None,
                Err(error) => {
                    tracing::warn!(rule_id = rule.id(), %error, "can_check failed, rule skipped");
                    None
                }
            })
            .collect()
    }

    /// Every ontology some registered rule requires, sorted.
    pub fn required_ontologies(&self) -> BTreeSet<String> {
        self.iter()
            .flat_map(|rule| rule.required_ontologies())
            .collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.ids())
            .finish()
    }
}
