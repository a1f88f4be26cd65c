//! Rule set sanity checks.
//!
//! Verifies that every rule name a rule set references is registered.
//! Unknown names are not fatal: they are logged here, and evaluation skips
//! any rule whose predicate is not registered at the time it runs.

use crate::PredicateRegistry;
use rules_core::RuleSet;
use tracing::warn;

/// A (field, rule) pair whose rule name is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRule {
    /// Field name
    pub field: String,
    /// Rule name
    pub rule: String,
}

/// Result of checking a rule set against a registry.
#[derive(Debug, Clone, Default)]
pub struct CheckedRules {
    unknown: Vec<UnknownRule>,
}

impl CheckedRules {
    /// Unknown pairs in rule set order.
    pub fn unknown(&self) -> &[UnknownRule] {
        &self.unknown
    }

    /// Returns true if every referenced rule is registered.
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Checks every rule referenced by `rules` against `registry`.
pub fn check_rules(rules: &RuleSet, registry: &PredicateRegistry) -> CheckedRules {
    let mut checked = CheckedRules::default();

    for (field, rule, _) in rules.iter() {
        if !registry.has(rule) {
            warn!("No validation rule named '{}' (field: '{}')", rule, field);
            checked.unknown.push(UnknownRule {
                field: field.to_string(),
                rule: rule.to_string(),
            });
        }
    }

    checked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rules_core::RuleSetBuilder;

    #[test]
    fn test_all_rules_known() {
        let rules = RuleSetBuilder::new()
            .rule("age", "required", true)
            .rule("age", "number", true)
            .build();

        let checked = check_rules(&rules, &PredicateRegistry::with_builtins());
        assert!(checked.is_clean());
        assert!(checked.unknown().is_empty());
    }

    #[test]
    fn test_unknown_rules_are_flagged_not_removed() {
        let rules = RuleSetBuilder::new()
            .rule("age", "required", true)
            .rule("age", "foo", true)
            .rule("name", "bar", 1)
            .build();

        let checked = check_rules(&rules, &PredicateRegistry::with_builtins());

        assert_eq!(
            checked.unknown(),
            &[
                UnknownRule {
                    field: "age".to_string(),
                    rule: "foo".to_string(),
                },
                UnknownRule {
                    field: "name".to_string(),
                    rule: "bar".to_string(),
                },
            ]
        );
        assert!(!checked.is_clean());
        assert_eq!(rules.iter().count(), 3);
    }
}
