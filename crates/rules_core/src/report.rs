//! Failure reporting types.
//!
//! Evaluation stops at the first failing (field, rule) pair. That pair is
//! described by a [`RuleFailure`]; when a message is configured for it, the
//! failure becomes a [`FailureReport`] handed to a notifier.

use crate::Value;
use serde::Serialize;

/// The first failing (field, rule) pair of an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    /// Field name
    pub field: String,

    /// Rule name
    pub rule: String,

    /// Value the predicate was evaluated against
    pub value: Value,

    /// Normalized extra arguments
    pub param: Vec<Value>,

    /// Configured message, if any
    pub message: Option<String>,
}

impl RuleFailure {
    /// Converts into a notifier payload. Failures without a message produce none.
    pub fn into_report(self) -> Option<FailureReport> {
        let msg = self.message?;
        Some(FailureReport {
            name: self.field,
            value: self.value,
            param: self.param,
            rule: self.rule,
            msg,
        })
    }

    /// Borrowing form of [`RuleFailure::into_report`].
    pub fn to_report(&self) -> Option<FailureReport> {
        let msg = self.message.clone()?;
        Some(FailureReport {
            name: self.field.clone(),
            value: self.value.clone(),
            param: self.param.clone(),
            rule: self.rule.clone(),
            msg,
        })
    }
}

/// Payload delivered to notifiers.
///
/// Serializes as `{ name, value, param, rule, msg }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    /// Field name
    pub name: String,

    /// Offending value
    pub value: Value,

    /// Normalized extra arguments
    pub param: Vec<Value>,

    /// Rule name
    pub rule: String,

    /// Message to show
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn failure(message: Option<&str>) -> RuleFailure {
        RuleFailure {
            field: "age".to_string(),
            rule: "required".to_string(),
            value: Value::missing(),
            param: vec![Value::Bool(true)],
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_failure_without_message_has_no_report() {
        assert_eq!(failure(None).into_report(), None);
        assert_eq!(failure(None).to_report(), None);
    }

    #[test]
    fn test_to_report_matches_into_report() {
        let failure = failure(Some("Age is required"));
        assert_eq!(failure.to_report(), failure.clone().into_report());
    }

    #[test]
    fn test_report_serializes_with_public_keys() {
        let report = failure(Some("Age is required"))
            .into_report()
            .expect("message is set");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "age",
                "value": "",
                "param": [true],
                "rule": "required",
                "msg": "Age is required",
            })
        );
    }
}
