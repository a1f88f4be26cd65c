//! Parser for rule files and data records (YAML/TOML/JSON formats).
//!
//! A rule file declares the rules and messages of a validator:
//!
//! ```rust
//! use rules_core::RuleSpec;
//! use rules_parser::parse_yaml;
//!
//! let yaml = r#"
//! rules:
//!   password:
//!     required: true
//!     minLength: 6
//!   confirm:
//!     equalTo: { $value: password }
//!   age:
//!     range: [18, 99]
//! messages:
//!   password:
//!     required: Password is required
//! "#;
//!
//! let file = parse_yaml(yaml).expect("Failed to parse rule file");
//! let rules = file.rule_set();
//! assert!(matches!(rules.rules["confirm"]["equalTo"], RuleSpec::Computed(_)));
//! assert!(matches!(rules.rules["age"]["range"], RuleSpec::ArgList(_)));
//! ```
//!
//! Rule values map onto [`RuleSpec`] by shape: a sequence becomes an
//! argument list, a mapping whose only key is `$value` becomes a reference
//! to another field of the record, anything else is a literal.

use indexmap::IndexMap;
use rules_core::{FieldMessages, Record, RuleSet, RuleSpec, Value};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Key marking a reference to another field.
pub const FIELD_REF_KEY: &str = "$value";

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Data file does not hold a record or a list of records
    #[error("Invalid records: {0}")]
    InvalidRecords(String),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Contents of a rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    /// Field name to rule name to rule value
    #[serde(default)]
    pub rules: IndexMap<String, IndexMap<String, Value>>,

    /// Field name to rule name to message
    #[serde(default)]
    pub messages: IndexMap<String, FieldMessages>,

    /// Fields whose rules a patch file removes
    #[serde(default)]
    pub remove: Option<Value>,
}

impl RuleFile {
    /// Builds the rule set declared by this file.
    pub fn rule_set(&self) -> RuleSet {
        let rules = self
            .rules
            .iter()
            .map(|(field, rules)| {
                let specs = rules
                    .iter()
                    .map(|(rule, value)| (rule.clone(), rule_spec(value)))
                    .collect();
                (field.clone(), specs)
            })
            .collect();

        RuleSet {
            rules,
            messages: self.messages.clone(),
        }
    }

    /// The raw `remove` entry, to be applied by the validator.
    pub fn removals(&self) -> Option<&Value> {
        self.remove.as_ref()
    }
}

/// Maps a rule value from a file onto a [`RuleSpec`].
pub fn rule_spec(value: &Value) -> RuleSpec {
    match value {
        Value::List(items) => RuleSpec::ArgList(items.clone()),
        Value::Map(map) if map.len() == 1 => match map.get(FIELD_REF_KEY) {
            Some(Value::String(field)) => RuleSpec::field(field.clone()),
            _ => RuleSpec::Literal(value.clone()),
        },
        other => RuleSpec::Literal(other.clone()),
    }
}

/// Parse a rule file from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RuleFile> {
    let file: RuleFile = serde_yaml_ng::from_str(content)?;
    Ok(file)
}

/// Parse a rule file from a TOML string.
///
/// # Example
///
/// ```rust
/// use rules_parser::parse_toml;
///
/// let toml = r#"
/// [rules.age]
/// required = true
/// range = [18, 99]
///
/// [messages.age]
/// required = "Age is required"
/// "#;
///
/// let file = parse_toml(toml).unwrap();
/// assert_eq!(file.rule_set().message("age", "required"), Some("Age is required"));
/// ```
pub fn parse_toml(content: &str) -> Result<RuleFile> {
    let file: RuleFile =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(file)
}

/// Parse a rule file from a JSON string.
pub fn parse_json(content: &str) -> Result<RuleFile> {
    let file: RuleFile = serde_json::from_str(content)?;
    Ok(file)
}

/// Detect the file format from a path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `FileFormat::Yaml`
/// * `.toml` → `FileFormat::Toml`
/// * `.json` → `FileFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a rule file with automatic format detection.
///
/// ```no_run
/// use rules_parser::parse_file;
/// use std::path::Path;
///
/// let file = parse_file(Path::new("rules/signup.yml")).unwrap();
/// println!("Loaded rules for {} fields", file.rules.len());
/// ```
pub fn parse_file(path: &Path) -> Result<RuleFile> {
    let content = std::fs::read_to_string(path)?;

    match detect_format(path)? {
        FileFormat::Yaml => parse_yaml(&content),
        FileFormat::Toml => parse_toml(&content),
        FileFormat::Json => parse_json(&content),
    }
}

/// Parse data records from a string.
///
/// The document holds either a single record (a mapping) or a list of
/// records.
pub fn parse_records(content: &str, format: FileFormat) -> Result<Vec<Record>> {
    let document: Value = match format {
        FileFormat::Yaml => serde_yaml_ng::from_str(content)?,
        FileFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?
        }
        FileFormat::Json => serde_json::from_str(content)?,
    };

    match document {
        Value::Map(record) => Ok(vec![record]),
        Value::List(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Map(record) => Ok(record),
                other => Err(ParserError::InvalidRecords(format!(
                    "entry {} is a {}, expected a mapping",
                    index,
                    other.type_name()
                ))),
            })
            .collect(),
        other => Err(ParserError::InvalidRecords(format!(
            "expected a mapping or a list of mappings, found {}",
            other.type_name()
        ))),
    }
}

/// Parse data records from a file with automatic format detection.
pub fn parse_records_file(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content, detect_format(path)?)
}
