//! Dynamically typed field values.
//!
//! Records handed to the engine are loosely typed: a form field may carry a
//! string, a number, a flag or a nested structure. [`Value`] models that, and
//! offers the coercions predicates need (textual and numeric views).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Decimal notation accepted for numeric text: optional sign, digits,
/// optional fraction. No exponents, no `inf`/`nan`.
static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:\d+(?:\.\d+)?|\.\d+)$").expect("valid regex"));

/// A value held by a record field or passed as a rule argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// List/array value
    List(Vec<Value>),
    /// Map/struct value
    Map(HashMap<String, Value>),
}

/// A single data record: field name to value.
pub type Record = HashMap<String, Value>;

impl Value {
    /// The value a field resolves to when the record does not contain it.
    pub fn missing() -> Self {
        Value::String(String::new())
    }

    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for null, the empty string and empty collections.
    ///
    /// Whitespace is content: `"   "` is not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get this value as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view of the value.
    ///
    /// Integers and finite floats convert directly. Strings convert only
    /// when, once trimmed, they are plain decimal notation. Everything else
    /// has no numeric view.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f).filter(|n| n.is_finite()),
            Value::String(s) => {
                let text = s.trim();
                if DECIMAL_REGEX.is_match(text) {
                    text.parse::<f64>().ok()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Textual view of the value, as a form would display it.
    ///
    /// Null renders as the empty string, scalars use their natural
    /// formatting and collections render as JSON.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Loose equality used by comparison predicates.
    ///
    /// Values of the same kind compare structurally; otherwise both sides
    /// are compared through their textual view, so `Int(30)` equals `"30"`.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            return self == other;
        }
        match (self.to_number(), other.to_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_text() == other.to_text(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from("test").type_name(), "string");
        assert_eq!(Value::Int(42).type_name(), "int64");
        assert_eq!(Value::Float(3.5).type_name(), "float64");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::from(vec![1, 2]).type_name(), "list");
    }

    #[test]
    fn test_emptiness() {
        assert!(Value::Null.is_empty());
        assert!(Value::missing().is_empty());
        assert!(!Value::from("   ").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::from("x").is_empty());
        assert!(!Value::Int(0).is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::from("30").to_number(), Some(30.0));
        assert_eq!(Value::from(" -1.5 ").to_number(), Some(-1.5));
        assert_eq!(Value::from("abc").to_number(), None);
        assert_eq!(Value::from("inf").to_number(), None);
        assert_eq!(Value::from("1e3").to_number(), None);
        assert_eq!(Value::from("0x10").to_number(), None);
        assert_eq!(Value::from("   ").to_number(), None);
        assert_eq!(Value::from(".5").to_number(), Some(0.5));
        assert_eq!(Value::Float(f64::NAN).to_number(), None);
        assert_eq!(Value::Int(7).to_number(), Some(7.0));
        assert_eq!(Value::Bool(true).to_number(), None);
    }

    #[test]
    fn test_text_view() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Int(12).to_text(), "12");
        assert_eq!(Value::Bool(false).to_text(), "false");
        assert_eq!(Value::from(vec!["a", "b"]).to_text(), r#"["a","b"]"#);
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Int(30).loosely_equals(&Value::from("30")));
        assert!(Value::from("abc").loosely_equals(&Value::from("abc")));
        assert!(!Value::from("abc").loosely_equals(&Value::from("abd")));
        assert!(Value::Float(2.0).loosely_equals(&Value::Int(2)));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "name": "ada",
            "age": 36,
            "score": 9.5,
            "tags": ["x", null],
        });

        let Value::Map(map) = Value::from(json) else {
            panic!("expected a map");
        };

        assert_eq!(map.get("name"), Some(&Value::from("ada")));
        assert_eq!(map.get("age"), Some(&Value::Int(36)));
        assert_eq!(map.get("score"), Some(&Value::Float(9.5)));
        assert_eq!(
            map.get("tags"),
            Some(&Value::List(vec![Value::from("x"), Value::Null]))
        );
    }
}
