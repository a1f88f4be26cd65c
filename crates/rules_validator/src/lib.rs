//! # Field Rules Validator
//!
//! Rule registry and evaluation engine. This crate provides:
//!
//! - A predicate registry seeded with built-in form checks and open to
//!   runtime registration
//! - Rule set checks flagging unregistered rule names
//! - First-failure evaluation of records against a rule set
//! - Notifier dispatch with per-call, per-instance, global and host hooks
//!
//! ## Example
//!
//! ```rust
//! use rules_core::{Record, RuleSetBuilder, RuleSpec, Value};
//! use rules_validator::{Environment, Registration, RuleValidator};
//! use std::sync::Arc;
//!
//! let env = Arc::new(Environment::new());
//! let outcome = env.add_rule("even", |value, _| {
//!     value.to_number().is_some_and(|n| n % 2.0 == 0.0)
//! });
//! assert_eq!(outcome, Registration::Registered);
//!
//! let rules = RuleSetBuilder::new()
//!     .rule("count", "required", true)
//!     .rule("count", "even", true)
//!     .rule("confirm", "equalTo", RuleSpec::field("password"))
//!     .build();
//! let validator = RuleValidator::with_environment(env, rules);
//!
//! let mut record = Record::new();
//! record.insert("count".to_string(), Value::from("4"));
//! assert!(validator.is_valid(&record));
//! ```

pub mod builtins;
mod checker;
mod engine;
mod environment;
mod notifier;
mod registry;

pub use checker::*;
pub use engine::*;
pub use environment::*;
pub use notifier::*;
pub use registry::*;
