//! Declarative rule sets and engine settings.
//!
//! Rule sets are JSON documents; each entry names a rule type registered
//! with a [`RuleFactory`](crate::RuleFactory) plus its parameters:
//!
//! ```json
//! {
//!   "engine": { "parallelism": { "threads": 4 }, "rule_time_budget_ms": 500 },
//!   "rules": [
//!     { "id": "INTERACTOR_NAME", "type": "non_empty_field",
//!       "params": { "field": "name", "kind": "interactor" } },
//!     { "id": "DETECTION_METHOD", "type": "descendant_of",
//!       "params": { "ontology": "MI", "field": "detection_method", "allowed": ["MI:0001"] } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One configured rule: its id, type tag, and constructor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RuleDescriptor {
    pub fn new(id: impl Into<String>, rule_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rule_type: rule_type.into(),
            name: None,
            description: None,
            params: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Decode the parameters into a rule's typed parameter struct.
    ///
    /// Absent parameters decode like an empty object, so types whose fields
    /// all have defaults need no `params` entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParams`] when the parameters do not fit `T`.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T> {
        let value = if self.params.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            self.params.clone()
        };
        serde_json::from_value(value).map_err(|err| ConfigError::invalid_params(&self.id, err))
    }
}

/// How the engine spreads work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parallelism {
    /// One subject after another on the calling thread.
    #[default]
    Serial,
    /// Contiguous subject chunks on up to this many scoped threads.
    Threads(usize),
}

/// Engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub parallelism: Parallelism,
    /// Per-(subject, rule) time budget in milliseconds. `None` disables it.
    ///
    /// The budget is checked after `check` returns. It discards the late
    /// unit's messages but never interrupts a rule, so a rule that does not
    /// return still blocks its subject's pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_time_budget_ms: Option<u64>,
}

impl EngineConfig {
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the time budget. See [`EngineConfig::rule_time_budget_ms`].
    #[must_use]
    pub fn with_rule_time_budget(mut self, budget: Duration) -> Self {
        self.rule_time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn rule_time_budget(&self) -> Option<Duration> {
        self.rule_time_budget_ms.map(Duration::from_millis)
    }

    /// Worker count to use; serial and zero threads both mean one.
    pub fn worker_count(&self) -> usize {
        match self.parallelism {
            Parallelism::Serial => 1,
            Parallelism::Threads(count) => count.max(1),
        }
    }
}

/// A declarative rule set, usually read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
}

impl RuleSetConfig {
    /// Parse a rule set from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigParse`] on malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| ConfigError::ConfigParse { source })
    }

    /// Read and parse a rule set file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigRead`] if the file cannot be read and
    /// [`ConfigError::ConfigParse`] if it is not a valid rule set.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            rules = config.rules.len(),
            "rule set loaded"
        );
        Ok(config)
    }
}
