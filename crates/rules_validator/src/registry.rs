//! Predicate registry.
//!
//! Maps rule names to predicates. The first registration of a name wins;
//! later registrations under the same name leave the original in place.

use crate::builtins;
use rules_core::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// A validation predicate: the field value followed by the extra arguments
/// produced by the rule spec.
pub type Predicate = Arc<dyn Fn(&Value, &[Value]) -> bool + Send + Sync>;

/// Outcome of a registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The predicate was installed
    Registered,
    /// A predicate with this name already exists and stays active
    AlreadyExists,
    /// The registration was not usable (blank name)
    Rejected,
}

impl Registration {
    /// Returns true if the predicate was installed.
    pub fn is_registered(&self) -> bool {
        matches!(self, Registration::Registered)
    }
}

/// Registry of named predicates.
pub struct PredicateRegistry {
    predicates: RwLock<HashMap<String, Predicate>>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            predicates: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry seeded with every built-in predicate.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtins::register_all(&registry);
        registry
    }

    /// Registers a predicate under `name`.
    ///
    /// Never fails: duplicates and blank names are reported through the
    /// returned [`Registration`] and otherwise ignored.
    pub fn register<F>(&self, name: impl Into<String>, predicate: F) -> Registration
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.register_arc(name, Arc::new(predicate))
    }

    /// Registers an already shared predicate.
    pub fn register_arc(&self, name: impl Into<String>, predicate: Predicate) -> Registration {
        let name = name.into();
        if name.trim().is_empty() {
            debug!("Rejected predicate registration with a blank name");
            return Registration::Rejected;
        }

        let mut predicates = self
            .predicates
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if predicates.contains_key(&name) {
            debug!("Predicate '{}' is already registered, keeping the original", name);
            return Registration::AlreadyExists;
        }

        debug!("Registered predicate '{}'", name);
        predicates.insert(name, predicate);
        Registration::Registered
    }

    /// Returns true if a predicate is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.predicates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Returns the predicate registered under `name`.
    pub fn get(&self, name: &str) -> Option<Predicate> {
        self.predicates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns every registered name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .predicates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns the number of registered predicates.
    pub fn len(&self) -> usize {
        self.predicates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}
