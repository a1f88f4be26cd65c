//! Tests loading rule and data files from disk.

use pretty_assertions::assert_eq;
use rules_core::{RuleSpec, Value};
use rules_parser::{ParserError, parse_file, parse_records_file};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

#[test]
fn test_same_rules_in_every_format() {
    let dir = TempDir::new().unwrap();

    let yaml = write(
        &dir,
        "signup.yml",
        r#"
rules:
  age:
    required: true
    range: [18, 99]
messages:
  age:
    range: Age must be between 18 and 99
"#,
    );
    let toml = write(
        &dir,
        "signup.toml",
        r#"
[rules.age]
required = true
range = [18, 99]

[messages.age]
range = "Age must be between 18 and 99"
"#,
    );
    let json = write(
        &dir,
        "signup.json",
        r#"{
  "rules": { "age": { "required": true, "range": [18, 99] } },
  "messages": { "age": { "range": "Age must be between 18 and 99" } }
}"#,
    );

    for path in [yaml, toml, json] {
        let set = parse_file(&path).unwrap().rule_set();
        assert_eq!(set.rules["age"].len(), 2, "{}", path.display());
        assert!(matches!(
            &set.rules["age"]["range"],
            RuleSpec::ArgList(args) if args == &vec![Value::Int(18), Value::Int(99)]
        ));
        assert_eq!(
            set.message("age", "range"),
            Some("Age must be between 18 and 99")
        );
    }
}

#[test]
fn test_missing_file() {
    let result = parse_file(std::path::Path::new("does/not/exist.yml"));
    assert!(matches!(result, Err(ParserError::IoError(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rules.ini", "[rules]");

    assert!(matches!(
        parse_file(&path),
        Err(ParserError::UnsupportedFormat(ext)) if ext == "ini"
    ));
}

#[test]
fn test_records_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "people.json",
        r#"[{"name": "ada", "age": 36}, {"name": "", "age": "x"}]"#,
    );

    let records = parse_records_file(&path).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("age"), Some(&Value::Int(36)));
    assert_eq!(records[1].get("name"), Some(&Value::from("")));
}
