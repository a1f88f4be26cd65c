//! Rule specifications and rule sets.
//!
//! A [`RuleSet`] maps each field to an ordered set of rules, and each rule to
//! a [`RuleSpec`] describing how the predicate's extra arguments are
//! obtained. Messages live beside the rules, keyed the same way.
//!
//! Both maps preserve insertion order: evaluation walks fields, then rules,
//! in exactly the order they were added.

use crate::{Record, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Function computing a rule argument from the field value and the full record.
pub type ComputeFn = Arc<dyn Fn(&Value, &Record) -> Value + Send + Sync>;

/// Rule name to rule specification, in insertion order.
pub type FieldRules = IndexMap<String, RuleSpec>;

/// Rule name to message, in insertion order.
pub type FieldMessages = IndexMap<String, String>;

/// How the extra arguments of a predicate are obtained for one (field, rule) pair.
#[derive(Clone)]
pub enum RuleSpec {
    /// A fixed value passed as the sole extra argument.
    Literal(Value),

    /// Computed at evaluation time from the field value and the whole record.
    /// The result is passed as the sole extra argument.
    Computed(ComputeFn),

    /// Extra arguments spread positionally after the field value.
    ArgList(Vec<Value>),
}

impl RuleSpec {
    /// Creates a literal spec.
    pub fn literal(value: impl Into<Value>) -> Self {
        RuleSpec::Literal(value.into())
    }

    /// Creates an argument-list spec.
    pub fn args<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        RuleSpec::ArgList(args.into_iter().map(Into::into).collect())
    }

    /// Creates a computed spec.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value, &Record) -> Value + Send + Sync + 'static,
    {
        RuleSpec::Computed(Arc::new(f))
    }

    /// Computed spec yielding the current value of another field.
    ///
    /// Absent fields resolve to the empty string, the same default the
    /// evaluator applies to the field under test.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        RuleSpec::computed(move |_, record| {
            record.get(&name).cloned().unwrap_or_else(Value::missing)
        })
    }

    /// Extra predicate arguments for `value`, in the order the predicate
    /// receives them after the value itself.
    pub fn extra_arguments(&self, value: &Value, record: &Record) -> Vec<Value> {
        match self {
            RuleSpec::Computed(compute) => vec![compute(value, record)],
            RuleSpec::ArgList(args) => args.clone(),
            RuleSpec::Literal(literal) => vec![literal.clone()],
        }
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSpec::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            RuleSpec::Computed(_) => f.write_str("Computed(<fn>)"),
            RuleSpec::ArgList(args) => f.debug_tuple("ArgList").field(args).finish(),
        }
    }
}

impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        RuleSpec::Literal(value)
    }
}

impl From<bool> for RuleSpec {
    fn from(b: bool) -> Self {
        RuleSpec::Literal(Value::Bool(b))
    }
}

impl From<i32> for RuleSpec {
    fn from(i: i32) -> Self {
        RuleSpec::Literal(Value::from(i))
    }
}

impl From<i64> for RuleSpec {
    fn from(i: i64) -> Self {
        RuleSpec::Literal(Value::Int(i))
    }
}

impl From<f64> for RuleSpec {
    fn from(f: f64) -> Self {
        RuleSpec::Literal(Value::Float(f))
    }
}

impl From<&str> for RuleSpec {
    fn from(s: &str) -> Self {
        RuleSpec::Literal(Value::from(s))
    }
}

impl From<String> for RuleSpec {
    fn from(s: String) -> Self {
        RuleSpec::Literal(Value::String(s))
    }
}

/// Rules and messages for one validator instance.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Field name to rules, in insertion order
    pub rules: IndexMap<String, FieldRules>,

    /// Field name to messages, in insertion order
    pub messages: IndexMap<String, FieldMessages>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field carries rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over every (field, rule name, spec) triple in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &RuleSpec)> {
        self.rules.iter().flat_map(|(field, rules)| {
            rules
                .iter()
                .map(move |(rule, spec)| (field.as_str(), rule.as_str(), spec))
        })
    }

    /// Looks up the message for a (field, rule) pair.
    pub fn message(&self, field: &str, rule: &str) -> Option<&str> {
        self.messages
            .get(field)
            .and_then(|messages| messages.get(rule))
            .map(String::as_str)
    }

    /// Shallow merge of another rule set into this one.
    ///
    /// A field present in both is replaced wholesale by the incoming entry,
    /// for rules and messages alike. Existing fields keep their position;
    /// new fields are appended.
    pub fn merge(&mut self, other: RuleSet) {
        for (field, rules) in other.rules {
            self.rules.insert(field, rules);
        }
        for (field, messages) in other.messages {
            self.messages.insert(field, messages);
        }
    }

    /// Removes the rules of the named fields. Messages are kept.
    pub fn remove_fields<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.rules.shift_remove(name.as_ref());
        }
    }
}
