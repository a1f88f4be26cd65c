//! Built-in predicate library.
//!
//! Seeds the default registry with the common form checks. Every predicate
//! takes the field value and the extra arguments produced by the rule spec.
//!
//! Empty values (null, the empty string, empty collections) pass every predicate
//! except `required`: a field that is optional but, when present, must be an
//! email is written `{ email: true }` without `required`.

use crate::PredicateRegistry;
use regex::Regex;
use rules_core::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use tracing::warn;
use validator::{ValidateEmail, ValidateUrl};

type BuiltinFn = fn(&Value, &[Value]) -> bool;

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+$").expect("valid regex"));
static MOBILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid regex"));
static CHINESE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\u{4e00}-\u{9fa5}]+$").expect("valid regex"));
static IDCARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{15}|\d{17}[\dXx])$").expect("valid regex"));

/// Upper bound on compiled patterns kept by one [`PatternMatcher`].
pub const PATTERN_CACHE_CAPACITY: usize = 256;

const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("required", required),
    ("number", number),
    ("digits", digits),
    ("integer", integer),
    ("email", email),
    ("mobile", mobile),
    ("url", url),
    ("chinese", chinese),
    ("idcard", idcard),
    ("min", min),
    ("max", max),
    ("range", range),
    ("minLength", min_length),
    ("maxLength", max_length),
    ("rangeLength", range_length),
    ("equalTo", equal_to),
    ("notEqualTo", not_equal_to),
    ("contains", contains),
    ("notContains", not_contains),
    ("oneOf", one_of),
];

/// Names of every built-in predicate.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once("pattern"))
}

/// Registers every built-in predicate into `registry`.
///
/// `pattern` gets a fresh [`PatternMatcher`], so its compiled regexes live
/// exactly as long as the registry does.
pub fn register_all(registry: &PredicateRegistry) {
    for (name, predicate) in BUILTINS {
        registry.register(*name, *predicate);
    }
    register_pattern(registry, Arc::new(PatternMatcher::default()));
}

/// Registers `matcher` as the `pattern` predicate.
pub fn register_pattern(registry: &PredicateRegistry, matcher: Arc<PatternMatcher>) {
    registry.register("pattern", move |value: &Value, args: &[Value]| {
        matcher.matches(value, args)
    });
}

/// Value must be non-empty. A `false` argument turns the check off.
pub fn required(value: &Value, args: &[Value]) -> bool {
    if matches!(args.first(), Some(Value::Bool(false))) {
        return true;
    }
    !value.is_empty()
}

/// Decimal number, optionally signed (see [`Value::to_number`]).
pub fn number(value: &Value, _args: &[Value]) -> bool {
    value.is_empty() || value.to_number().is_some()
}

/// Only ASCII digits.
pub fn digits(value: &Value, _args: &[Value]) -> bool {
    match value {
        Value::Int(i) => *i >= 0,
        other => optional_or(other, |text| DIGITS_REGEX.is_match(text)),
    }
}

/// Whole number, optionally signed.
pub fn integer(value: &Value, _args: &[Value]) -> bool {
    match value {
        Value::Int(_) => true,
        other => optional_or(other, |text| INTEGER_REGEX.is_match(text)),
    }
}

pub fn email(value: &Value, _args: &[Value]) -> bool {
    optional_or(value, |text| text.validate_email())
}

/// Mainland China mobile number (11 digits).
pub fn mobile(value: &Value, _args: &[Value]) -> bool {
    optional_or(value, |text| MOBILE_REGEX.is_match(text))
}

pub fn url(value: &Value, _args: &[Value]) -> bool {
    optional_or(value, |text| text.validate_url())
}

pub fn chinese(value: &Value, _args: &[Value]) -> bool {
    optional_or(value, |text| CHINESE_REGEX.is_match(text))
}

/// Mainland China resident ID number (15 or 18 characters).
pub fn idcard(value: &Value, _args: &[Value]) -> bool {
    optional_or(value, |text| IDCARD_REGEX.is_match(text))
}

/// Numeric value greater than or equal to the first argument.
pub fn min(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    match (value.to_number(), number_arg(args, 0)) {
        (Some(n), Some(bound)) => n >= bound,
        _ => false,
    }
}

/// Numeric value less than or equal to the first argument.
pub fn max(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    match (value.to_number(), number_arg(args, 0)) {
        (Some(n), Some(bound)) => n <= bound,
        _ => false,
    }
}

/// Numeric value within the inclusive bounds given by the two arguments.
pub fn range(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    match (value.to_number(), number_arg(args, 0), number_arg(args, 1)) {
        (Some(n), Some(lo), Some(hi)) => n >= lo && n <= hi,
        _ => false,
    }
}

pub fn min_length(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    number_arg(args, 0).is_some_and(|bound| length(value) as f64 >= bound)
}

pub fn max_length(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    number_arg(args, 0).is_some_and(|bound| length(value) as f64 <= bound)
}

pub fn range_length(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    match (number_arg(args, 0), number_arg(args, 1)) {
        (Some(lo), Some(hi)) => {
            let len = length(value) as f64;
            len >= lo && len <= hi
        }
        _ => false,
    }
}

/// Value equals the first argument (see [`Value::loosely_equals`]).
pub fn equal_to(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    args.first().is_some_and(|other| value.loosely_equals(other))
}

pub fn not_equal_to(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    args.first().is_some_and(|other| !value.loosely_equals(other))
}

/// Textual value contains the first argument.
pub fn contains(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    args.first()
        .is_some_and(|needle| value.to_text().contains(needle.to_text().as_ref()))
}

pub fn not_contains(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    args.first()
        .is_some_and(|needle| !value.to_text().contains(needle.to_text().as_ref()))
}

/// The `pattern` predicate: textual value matches the regex given as first
/// argument.
///
/// Compiled patterns are cached per matcher, up to
/// [`PATTERN_CACHE_CAPACITY`] entries; a full cache is cleared before the
/// next insert. An invalid pattern fails the check and is logged.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    cache: Mutex<HashMap<String, Regex>>,
}

impl PatternMatcher {
    pub fn matches(&self, value: &Value, args: &[Value]) -> bool {
        if value.is_empty() {
            return true;
        }
        let Some(source) = args.first().and_then(Value::as_str) else {
            return false;
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(regex) = cache.get(source) {
            return regex.is_match(&value.to_text());
        }

        match Regex::new(source) {
            Ok(regex) => {
                let matched = regex.is_match(&value.to_text());
                if cache.len() >= PATTERN_CACHE_CAPACITY {
                    cache.clear();
                }
                cache.insert(source.to_string(), regex);
                matched
            }
            Err(err) => {
                warn!("Invalid regex pattern '{}': {}", source, err);
                false
            }
        }
    }

    /// Number of compiled patterns currently cached.
    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Value equals one of the arguments.
pub fn one_of(value: &Value, args: &[Value]) -> bool {
    if value.is_empty() {
        return true;
    }
    args.iter().any(|candidate| value.loosely_equals(candidate))
}

fn optional_or(value: &Value, check: impl Fn(&str) -> bool) -> bool {
    value.is_empty() || check(value.to_text().trim())
}

fn number_arg(args: &[Value], index: usize) -> Option<f64> {
    args.get(index).and_then(Value::to_number)
}

/// Length in characters, or element count for lists and maps.
fn length(value: &Value) -> usize {
    match value {
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => other.to_text().chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_registers_every_builtin() {
        let registry = PredicateRegistry::new();
        register_all(&registry);

        assert_eq!(registry.len(), BUILTINS.len() + 1);
        for name in names() {
            assert!(registry.has(name), "missing builtin '{}'", name);
        }
    }

    #[test]
    fn test_required() {
        assert!(!required(&s(""), &[Value::Bool(true)]));
        // whitespace counts as an answer
        assert!(required(&s("   "), &[Value::Bool(true)]));
        assert!(!required(&Value::Null, &[Value::Bool(true)]));
        assert!(required(&s("x"), &[Value::Bool(true)]));
        assert!(required(&Value::Int(0), &[]));
        assert!(required(&s(""), &[Value::Bool(false)]));
    }

    #[test]
    fn test_number() {
        assert!(number(&s("30"), &[]));
        assert!(number(&s("-1.25"), &[]));
        assert!(number(&s(".5"), &[]));
        assert!(number(&Value::Int(3), &[]));
        assert!(!number(&s("abc"), &[]));
        assert!(!number(&s("1e"), &[]));
        assert!(number(&s(""), &[]));
        assert!(!number(&s("   "), &[]));
        assert!(!number(&Value::Float(f64::INFINITY), &[]));
    }

    #[test]
    fn test_exponents_are_not_numbers() {
        assert!(!number(&s("1e3"), &[]));
        assert!(!min(&s("1e3"), &[Value::Int(10)]));
        assert!(!max(&s("1e-3"), &[Value::Int(10)]));
        assert!(!range(&s("5e1"), &[Value::Int(18), Value::Int(99)]));
    }

    #[test]
    fn test_blank_strings_are_checked() {
        let blank = s("   ");
        assert!(!email(&blank, &[]));
        assert!(!digits(&blank, &[]));
        assert!(!mobile(&blank, &[]));
    }

    #[test]
    fn test_digits_and_integer() {
        assert!(digits(&s("0123"), &[]));
        assert!(!digits(&s("-1"), &[]));
        assert!(integer(&s("-1"), &[]));
        assert!(!integer(&s("1.5"), &[]));
    }

    #[test]
    fn test_formats() {
        assert!(email(&s("ada@example.com"), &[]));
        assert!(!email(&s("ada@"), &[]));
        assert!(url(&s("https://example.com/path"), &[]));
        assert!(!url(&s("not a url"), &[]));
        assert!(mobile(&s("13800138000"), &[]));
        assert!(!mobile(&s("12800138000"), &[]));
        assert!(chinese(&s("中文"), &[]));
        assert!(!chinese(&s("abc"), &[]));
        assert!(idcard(&s("11010519491231002X"), &[]));
        assert!(!idcard(&s("1101051949"), &[]));
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(min(&s("18"), &[Value::Int(18)]));
        assert!(!min(&s("17"), &[Value::Int(18)]));
        assert!(max(&s("99"), &[Value::Int(99)]));
        assert!(!max(&s("100"), &[Value::Int(99)]));
        assert!(range(&s("30"), &[Value::Int(18), Value::Int(99)]));
        assert!(!range(&s("10"), &[Value::Int(18), Value::Int(99)]));
        assert!(!range(&s("abc"), &[Value::Int(18), Value::Int(99)]));
        // a misconfigured rule never passes
        assert!(!range(&s("30"), &[Value::Int(18)]));
    }

    #[test]
    fn test_lengths() {
        assert!(min_length(&s("secret"), &[Value::Int(6)]));
        assert!(!min_length(&s("short"), &[Value::Int(6)]));
        assert!(max_length(&s("中文字"), &[Value::Int(3)]));
        assert!(range_length(&s("abcd"), &[Value::Int(2), Value::Int(4)]));
        assert!(!range_length(&s("abcde"), &[Value::Int(2), Value::Int(4)]));
        assert!(min_length(&Value::from(vec![1, 2]), &[Value::Int(2)]));
    }

    #[test]
    fn test_comparisons() {
        assert!(equal_to(&s("abc"), &[s("abc")]));
        assert!(!equal_to(&s("abc"), &[s("abd")]));
        assert!(equal_to(&s("30"), &[Value::Int(30)]));
        assert!(not_equal_to(&s("abc"), &[s("abd")]));
        assert!(contains(&s("hello world"), &[s("world")]));
        assert!(not_contains(&s("hello"), &[s("world")]));
        assert!(one_of(&s("b"), &[s("a"), s("b")]));
        assert!(!one_of(&s("c"), &[s("a"), s("b")]));
    }

    #[test]
    fn test_pattern() {
        let matcher = PatternMatcher::default();
        assert!(matcher.matches(&s("AB-12"), &[s(r"^[A-Z]{2}-\d{2}$")]));
        assert!(!matcher.matches(&s("ab-12"), &[s(r"^[A-Z]{2}-\d{2}$")]));
        assert!(!matcher.matches(&s("x"), &[s("(unclosed")]));
        assert!(!matcher.matches(&s("x"), &[]));
        assert!(matcher.matches(&Value::missing(), &[s("^x$")]));
        assert_eq!(matcher.cached(), 1);
    }

    #[test]
    fn test_pattern_cache_is_bounded() {
        let matcher = PatternMatcher::default();
        for i in 0..PATTERN_CACHE_CAPACITY * 2 + 3 {
            assert!(matcher.matches(&s("x"), &[s(&format!("^x{{1,{}}}$", i + 1))]));
            assert!(matcher.cached() <= PATTERN_CACHE_CAPACITY);
        }
    }

    #[test]
    fn test_pattern_cache_dropped_with_registry() {
        let matcher = Arc::new(PatternMatcher::default());
        let registry = PredicateRegistry::new();
        register_pattern(&registry, Arc::clone(&matcher));

        let predicate = registry.get("pattern").unwrap();
        for i in 0..50 {
            let source = format!("^item-{}$", i);
            assert!(predicate(&s(&format!("item-{}", i)), &[s(&source)]));
        }
        assert_eq!(matcher.cached(), 50);

        drop(predicate);
        drop(registry);
        assert_eq!(Arc::strong_count(&matcher), 1);
    }

    #[test]
    fn test_empty_values_are_optional() {
        let empty = Value::missing();
        let registry = PredicateRegistry::with_builtins();
        for name in names() {
            if name == "required" {
                continue;
            }
            let predicate = registry.get(name).unwrap();
            assert!(
                predicate(&empty, &[Value::Int(1), Value::Int(2)]),
                "'{}' should accept an empty value",
                name
            );
        }
    }
}
