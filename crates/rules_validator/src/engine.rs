//! Main validation engine.
//!
//! This module provides [`RuleValidator`], which evaluates records against a
//! rule set. Fields are visited in insertion order and, within a field, rules
//! in insertion order. Evaluation stops at the first failing rule; at most
//! one failure is ever reported per call.

use crate::{CheckedRules, Environment, Notifier, NotifierChain, UnknownRule, check_rules};
use rules_core::{Record, Result, RuleFailure, RuleSet, RulesError, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Construction options for a [`RuleValidator`].
///
/// Defaults: no rules, no messages, no notifier.
#[derive(Clone, Default)]
pub struct ValidatorOptions {
    /// Rules and messages
    pub rules: RuleSet,

    /// Notifier used when `check_data` is not given one
    pub on_message: Option<Arc<dyn Notifier>>,
}

impl ValidatorOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules and messages.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the per-instance notifier.
    pub fn with_on_message(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.on_message = Some(notifier);
        self
    }
}

impl From<RuleSet> for ValidatorOptions {
    fn from(rules: RuleSet) -> Self {
        Self::new().with_rules(rules)
    }
}

impl fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorOptions")
            .field("rules", &self.rules)
            .field("on_message", &self.on_message.is_some())
            .finish()
    }
}

/// Validates records against a rule set.
///
/// # Example
///
/// ```rust
/// use rules_core::{Record, RuleSetBuilder, Value};
/// use rules_validator::RuleValidator;
///
/// let rules = RuleSetBuilder::new()
///     .rule("age", "required", true)
///     .rule("age", "number", true)
///     .message("age", "required", "Age is required")
///     .message("age", "number", "Age must be numeric")
///     .build();
///
/// let validator = RuleValidator::new(rules);
///
/// let mut record = Record::new();
/// record.insert("age".to_string(), Value::from("30"));
/// assert!(validator.is_valid(&record));
///
/// record.insert("age".to_string(), Value::from("abc"));
/// let failure = validator.first_failure(&record).unwrap();
/// assert_eq!(failure.rule, "number");
/// assert_eq!(failure.message.as_deref(), Some("Age must be numeric"));
/// ```
pub struct RuleValidator {
    env: Arc<Environment>,
    rules: RuleSet,
    on_message: Option<Arc<dyn Notifier>>,
    checked: CheckedRules,
}

impl RuleValidator {
    /// Creates a validator against the shared environment.
    pub fn new(options: impl Into<ValidatorOptions>) -> Self {
        Self::with_environment(Environment::shared(), options)
    }

    /// Creates a validator against an explicit environment.
    pub fn with_environment(env: Arc<Environment>, options: impl Into<ValidatorOptions>) -> Self {
        let options = options.into();
        let checked = check_rules(&options.rules, env.registry());
        Self {
            env,
            rules: options.rules,
            on_message: options.on_message,
            checked,
        }
    }

    /// Returns the environment this validator evaluates against.
    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }

    /// Returns the current rules and messages.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// (field, rule) pairs referencing unregistered rules, as of the last check.
    pub fn unknown_rules(&self) -> &[UnknownRule] {
        self.checked.unknown()
    }

    /// Merges rules and messages into the current set.
    ///
    /// A field present in both sets is replaced wholesale. The merged set is
    /// checked again against the registry.
    pub fn add_rules(&mut self, rules: RuleSet) {
        self.rules.merge(rules);
        self.checked = check_rules(&self.rules, self.env.registry());
    }

    /// Removes the rules of the named fields. Their messages are kept.
    pub fn remove_rules<S: AsRef<str>>(&mut self, names: &[S]) {
        self.rules.remove_fields(names);
    }

    /// Removes rules using a dynamically typed list of field names.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidArgument`] unless `names` is a list of
    /// strings. Nothing is removed in that case.
    pub fn remove_rules_value(&mut self, names: &Value) -> Result<()> {
        let Some(items) = names.as_list() else {
            return Err(RulesError::invalid_argument(format!(
                "remove_rules expects a list of field names, got {}",
                names.type_name()
            )));
        };

        let fields = items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    RulesError::invalid_argument(format!(
                        "field names must be strings, got {}",
                        item.type_name()
                    ))
                })
            })
            .collect::<Result<Vec<&str>>>()?;

        self.remove_rules(&fields);
        Ok(())
    }

    /// Evaluates `record` and returns the first failing rule, without
    /// notifying anyone.
    ///
    /// Rules whose name is not registered are skipped. Fields missing from
    /// the record are evaluated as the empty string.
    pub fn first_failure(&self, record: &Record) -> Option<RuleFailure> {
        let registry = self.env.registry();

        for (field, rule, spec) in self.rules.iter() {
            let Some(predicate) = registry.get(rule) else {
                debug!("Skipping unregistered rule '{}' on field '{}'", rule, field);
                continue;
            };

            let value = record.get(field).cloned().unwrap_or_else(Value::missing);
            let param = spec.extra_arguments(&value, record);

            if predicate(&value, &param) {
                continue;
            }

            debug!("Rule '{}' failed on field '{}'", rule, field);
            return Some(RuleFailure {
                field: field.to_string(),
                rule: rule.to_string(),
                value,
                param,
                message: self.rules.message(field, rule).map(String::from),
            });
        }

        None
    }

    /// Validates `record`, reporting the first failure.
    ///
    /// When `emit_messages` is true and the failing rule has a message, the
    /// failure is dispatched to the first available notifier: `on_message`,
    /// then this validator's notifier, then the environment's global and
    /// host notifiers.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Notify`] if the chosen notifier fails.
    pub fn check_data(
        &self,
        record: &Record,
        on_message: Option<&dyn Notifier>,
        emit_messages: bool,
    ) -> Result<bool> {
        let Some(failure) = self.first_failure(record) else {
            return Ok(true);
        };

        if emit_messages {
            self.notify_failure(&failure, on_message)?;
        }

        Ok(false)
    }

    /// Dispatches an already computed failure the way `check_data` does.
    ///
    /// Returns `Ok(true)` if a notifier received the report, `Ok(false)` if
    /// the failure has no message or no notifier is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Notify`] if the chosen notifier fails.
    pub fn notify_failure(
        &self,
        failure: &RuleFailure,
        on_message: Option<&dyn Notifier>,
    ) -> Result<bool> {
        let Some(report) = failure.to_report() else {
            return Ok(false);
        };

        let global = self.env.global_notifier();
        let chain = NotifierChain::new(
            on_message,
            self.on_message.as_deref(),
            global.as_deref(),
            self.env.host_notifier().map(|n| n.as_ref()),
        );
        Ok(chain.dispatch(&report)?)
    }

    /// Validates `record` without notifying anyone.
    pub fn is_valid(&self, record: &Record) -> bool {
        self.first_failure(record).is_none()
    }
}

impl fmt::Debug for RuleValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleValidator")
            .field("rules", &self.rules)
            .field("on_message", &self.on_message.is_some())
            .field("unknown_rules", &self.checked.unknown())
            .finish()
    }
}
