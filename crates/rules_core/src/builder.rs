//! Builder pattern for creating rule sets.
//!
//! This module provides ergonomic builders for constructing rule sets with a
//! fluent API, keeping the insertion order the evaluator relies on.

use crate::{FieldMessages, FieldRules, RuleSet, RuleSpec};

/// Builder for creating a `RuleSet`.
///
/// # Example
///
/// ```rust
/// use rules_core::{RuleSetBuilder, RuleSpec};
///
/// let rules = RuleSetBuilder::new()
///     .rule("password", "required", true)
///     .rule("password", "minLength", 6)
///     .rule("confirm", "equalTo", RuleSpec::field("password"))
///     .message("password", "required", "Password is required")
///     .build();
///
/// assert_eq!(rules.rules.len(), 2);
/// assert_eq!(rules.message("password", "required"), Some("Password is required"));
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    set: RuleSet,
}

impl RuleSetBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to a field. Re-adding a rule name replaces its spec in place.
    pub fn rule(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        spec: impl Into<RuleSpec>,
    ) -> Self {
        self.set
            .rules
            .entry(field.into())
            .or_default()
            .insert(rule.into(), spec.into());
        self
    }

    /// Adds a message for a (field, rule) pair.
    pub fn message(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.set
            .messages
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
        self
    }

    /// Adds a field built with [`FieldRulesBuilder`], replacing any earlier
    /// entry for the same field.
    pub fn field(mut self, field: FieldRulesBuilder) -> Self {
        let (name, rules, messages) = field.build();
        self.set.rules.insert(name.clone(), rules);
        if !messages.is_empty() {
            self.set.messages.insert(name, messages);
        }
        self
    }

    /// Builds the rule set.
    pub fn build(self) -> RuleSet {
        self.set
    }
}

/// Builder for the rules and messages of a single field.
///
/// # Example
///
/// ```rust
/// use rules_core::{FieldRulesBuilder, RuleSetBuilder};
///
/// let rules = RuleSetBuilder::new()
///     .field(
///         FieldRulesBuilder::new("age")
///             .rule("required", true)
///             .message("required", "Age is required")
///             .rule("number", true)
///             .message("number", "Age must be numeric"),
///     )
///     .build();
///
/// assert_eq!(rules.rules["age"].len(), 2);
/// ```
#[derive(Debug)]
pub struct FieldRulesBuilder {
    name: String,
    rules: FieldRules,
    messages: FieldMessages,
}

impl FieldRulesBuilder {
    /// Creates a builder for the named field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: FieldRules::new(),
            messages: FieldMessages::new(),
        }
    }

    /// Adds a rule.
    pub fn rule(mut self, rule: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.rules.insert(rule.into(), spec.into());
        self
    }

    /// Adds a message for a rule.
    pub fn message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(rule.into(), message.into());
        self
    }

    /// Consumes the builder, returning the field name, rules and messages.
    pub fn build(self) -> (String, FieldRules, FieldMessages) {
        (self.name, self.rules, self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_collects_rules_and_messages() {
        let set = RuleSetBuilder::new()
            .rule("age", "required", true)
            .rule("age", "range", RuleSpec::args([18, 99]))
            .message("age", "required", "Age is required")
            .build();

        assert_eq!(set.rules.len(), 1);
        assert!(matches!(
            set.rules["age"]["required"],
            RuleSpec::Literal(Value::Bool(true))
        ));
        assert!(matches!(&set.rules["age"]["range"], RuleSpec::ArgList(args) if args.len() == 2));
        assert_eq!(set.message("age", "required"), Some("Age is required"));
        assert_eq!(set.message("age", "range"), None);
    }

    #[test]
    fn test_field_builder_replaces_field() {
        let set = RuleSetBuilder::new()
            .rule("name", "required", true)
            .field(FieldRulesBuilder::new("name").rule("maxLength", 20))
            .build();

        let rules: Vec<&String> = set.rules["name"].keys().collect();
        assert_eq!(rules, vec!["maxLength"]);
        assert!(set.messages.is_empty());
    }
}
