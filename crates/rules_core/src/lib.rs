//! # Field Rules Core
//!
//! Core data structures for the Field Rules Engine.
//!
//! A rule set declares, per field, which named predicates a record must
//! satisfy and how each predicate receives its arguments. This crate holds
//! the types shared by the evaluator, the rule-file parser and the CLI.
//!
//! ## Key Concepts
//!
//! - **Value / Record**: loosely typed field values and the records holding them
//! - **RuleSpec**: how a predicate's extra arguments are obtained (literal, computed, list)
//! - **RuleSet**: ordered field rules plus their messages
//! - **FailureReport**: the payload describing the first failing rule
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{RuleSetBuilder, RuleSpec};
//!
//! let rules = RuleSetBuilder::new()
//!     .rule("age", "required", true)
//!     .rule("age", "number", true)
//!     .rule("age", "range", RuleSpec::args([18, 99]))
//!     .message("age", "required", "Age is required")
//!     .build();
//!
//! assert_eq!(rules.iter().count(), 3);
//! ```

pub mod builder;
pub mod error;
pub mod report;
pub mod rule_set;
pub mod value;

pub use builder::*;
pub use error::*;
pub use report::*;
pub use rule_set::*;
pub use value::*;
