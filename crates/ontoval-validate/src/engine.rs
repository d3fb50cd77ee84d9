//! Validation engine.
//!
//! Runs every applicable rule against every subject and collects the
//! findings. The unit of isolation is one (subject, rule) pair:
//!
//! - `Err` from `check`: recorded as a [`RuleFailure`], the pass continues
//! - Panic in `can_check` or `check`: caught, recorded as
//!   [`RuleError::Panicked`]
//! - Slow rule: messages dropped, recorded as
//!   [`RuleError::TimeBudgetExceeded`] when a budget is configured. The
//!   elapsed time is measured once `check` returns; a running rule is never
//!   interrupted.
//!
//! Output order is subject index, then rule registration order, then the
//! order each rule emitted its messages. Threaded and serial runs produce
//! identical results.

use std::time::Instant;

use ontoval_model::{Subject, ValidatorMessage};
use ontoval_ontology::{OntologySnapshot, TermResolver};
use tracing::Span;

use crate::config::EngineConfig;
use crate::error::{ConfigError, Result, RuleError};
use crate::guard::guarded;
use crate::logging::DISPATCH_TARGET;
use crate::registry::RuleRegistry;
use crate::result::{RuleFailure, ValidationResult};
use crate::rule::{ObjectRule, Rule, RuleContext};

/// Applies a rule registry to subjects against one ontology snapshot.
///
/// The engine holds no mutable state; one engine can serve any number of
/// passes, from any number of threads.
#[derive(Debug)]
pub struct ValidationEngine {
    registry: RuleRegistry,
    snapshot: OntologySnapshot,
    config: EngineConfig,
}

impl ValidationEngine {
    /// Create an engine with the default (serial, unbounded) settings.
    ///
    /// # Errors
    ///
    /// Same as [`ValidationEngine::with_config`].
    pub fn new(registry: RuleRegistry, snapshot: OntologySnapshot) -> Result<Self> {
        Self::with_config(registry, snapshot, EngineConfig::default())
    }

    /// Create an engine with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOntology`] when a rule requires an
    /// ontology the snapshot does not hold, and [`ConfigError::UnknownTerm`]
    /// when a rule is configured against a term its ontology lacks.
    pub fn with_config(
        registry: RuleRegistry,
        snapshot: OntologySnapshot,
        config: EngineConfig,
    ) -> Result<Self> {
        for rule in registry.iter() {
            check_requirements(rule, &snapshot)?;
        }
        tracing::debug!(
            rules = registry.len(),
            ontologies = snapshot.len(),
            workers = config.worker_count(),
            "validation engine ready"
        );
        Ok(Self {
            registry,
            snapshot,
            config,
        })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> &OntologySnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a batch of subjects.
    ///
    /// Never fails: rule failures are part of the returned result.
    pub fn validate(&self, subjects: &[Subject]) -> ValidationResult {
        let span = tracing::info_span!(
            "validate",
            subjects = subjects.len(),
            rules = self.registry.len()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let workers = self.config.worker_count().min(subjects.len());
        let result = if workers > 1 {
            self.validate_threaded(subjects, workers)
        } else {
            self.validate_range(subjects, 0)
        };

        tracing::info!(
            messages = result.messages.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            failures = result.failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "validation pass complete"
        );
        result
    }

    /// Validate a single subject.
    pub fn validate_one(&self, subject: &Subject) -> ValidationResult {
        self.validate(std::slice::from_ref(subject))
    }

    fn validate_threaded(&self, subjects: &[Subject], workers: usize) -> ValidationResult {
        let chunk_size = subjects.len().div_ceil(workers);
        let parent = Span::current();

        std::thread::scope(|scope| {
            let handles: Vec<_> = subjects
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let offset = chunk_index * chunk_size;
                    let span = parent.clone();
                    let handle = scope.spawn(move || {
                        let _guard = span.enter();
                        self.validate_range(chunk, offset)
                    });
                    (offset, chunk, handle)
                })
                .collect();

            let mut result = ValidationResult::new();
            for (offset, chunk, handle) in handles {
                match handle.join() {
                    Ok(partial) => result.merge(partial),
                    Err(_) => {
                        tracing::error!(
                            offset,
                            subjects = chunk.len(),
                            "validation worker died, re-running its chunk serially"
                        );
                        result.merge(self.validate_range(chunk, offset));
                    }
                }
            }
            result
        })
    }

    fn validate_range(&self, subjects: &[Subject], offset: usize) -> ValidationResult {
        let mut result = ValidationResult::new();
        for (position, subject) in subjects.iter().enumerate() {
            self.validate_subject(offset + position, subject, &mut result);
        }
        result
    }

    fn validate_subject(&self, index: usize, subject: &Subject, result: &mut ValidationResult) {
        for (rule, applies) in self.registry.candidates(subject) {
            match applies {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    record_failure(result, RuleFailure::new(rule.id(), index, error));
                    continue;
                }
            }

            tracing::debug!(
                target: DISPATCH_TARGET,
                rule_id = rule.id(),
                subject_index = index,
                subject = %subject.describe(),
                "dispatching rule"
            );
            match self.run_check(rule, subject, index) {
                Ok(messages) => result.messages.extend(
                    messages
                        .into_iter()
                        .map(|message| self.attribute(message, rule.id())),
                ),
                Err(error) => record_failure(result, RuleFailure::new(rule.id(), index, error)),
            }
        }
    }

    fn run_check(
        &self,
        rule: &dyn ObjectRule,
        subject: &Subject,
        index: usize,
    ) -> std::result::Result<Vec<ValidatorMessage>, RuleError> {
        let ctx = RuleContext::new(&self.snapshot, rule.id(), index);
        let start = Instant::now();
        let messages = guarded(|| rule.check(subject, &ctx))??;

        if let Some(budget) = self.config.rule_time_budget() {
            let elapsed = start.elapsed();
            if elapsed > budget {
                return Err(RuleError::TimeBudgetExceeded { elapsed, budget });
            }
        }
        Ok(messages)
    }

    /// Tag a message with the rule that emitted it.
    ///
    /// Messages naming a rule id the registry does not hold are re-tagged,
    /// so every reported message points at a registered rule.
    fn attribute(&self, message: ValidatorMessage, rule_id: &str) -> ValidatorMessage {
        match message.rule_id() {
            Some(tag) if !self.registry.contains(tag) => {
                tracing::debug!(rule_id, tag, "message names an unregistered rule, re-tagging");
                message.with_rule_id(rule_id)
            }
            _ => message.tagged(rule_id),
        }
    }
}

/// Every ontology and term a rule is configured against must be loaded.
fn check_requirements(rule: &dyn ObjectRule, snapshot: &OntologySnapshot) -> Result<()> {
    let missing_ontology = |ontology: String| ConfigError::MissingOntology {
        rule_id: rule.id().to_string(),
        ontology,
    };
    for ontology in rule.required_ontologies() {
        if !snapshot.has_ontology(&ontology) {
            return Err(missing_ontology(ontology));
        }
    }
    for term in rule.required_terms() {
        match snapshot.term_exists(&term.ontology, &term.term_id) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ConfigError::UnknownTerm {
                    rule_id: rule.id().to_string(),
                    ontology: term.ontology,
                    term_id: term.term_id,
                });
            }
            Err(_) => return Err(missing_ontology(term.ontology)),
        }
    }
    Ok(())
}

fn record_failure(result: &mut ValidationResult, failure: RuleFailure) {
    tracing::warn!(
        rule_id = %failure.rule_id,
        subject_index = failure.subject_index,
        kind = failure.kind().label(),
        error = %failure.error,
        "rule failed"
    );
    result.failures.push(failure);
}
