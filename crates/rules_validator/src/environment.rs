//! Validation environment.
//!
//! The environment is the composition root of the engine: it owns the
//! predicate registry shared by every validator built against it, the
//! process-wide notifier and the host notifier supplied by the application.
//!
//! Applications that want isolation construct their own environment and
//! pass it to [`RuleValidator::with_environment`](crate::RuleValidator::with_environment).
//! [`Environment::shared`] is a lazily created default seeded with the
//! built-in predicates and a [`TracingNotifier`] as host notifier.

use crate::{Notifier, PredicateRegistry, Registration, TracingNotifier};
use rules_core::Value;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

static SHARED: LazyLock<Arc<Environment>> = LazyLock::new(|| {
    Arc::new(
        Environment::builder()
            .host_notifier(Arc::new(TracingNotifier))
            .build(),
    )
});

/// Registry plus process-wide notification hooks.
pub struct Environment {
    registry: PredicateRegistry,
    global_notifier: RwLock<Option<Arc<dyn Notifier>>>,
    host_notifier: Option<Arc<dyn Notifier>>,
}

impl Environment {
    /// Creates an environment with the built-in predicates and no notifiers.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder.
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// Returns the process-wide default environment.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Returns the predicate registry.
    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// Registers a predicate for every validator using this environment.
    pub fn add_rule<F>(&self, name: impl Into<String>, predicate: F) -> Registration
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.registry.register(name, predicate)
    }

    /// Sets or clears the process-wide notifier.
    pub fn set_global_notifier(&self, notifier: Option<Arc<dyn Notifier>>) {
        *self
            .global_notifier
            .write()
            .unwrap_or_else(PoisonError::into_inner) = notifier;
    }

    /// Returns the process-wide notifier.
    pub fn global_notifier(&self) -> Option<Arc<dyn Notifier>> {
        self.global_notifier
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the host notifier.
    pub fn host_notifier(&self) -> Option<&Arc<dyn Notifier>> {
        self.host_notifier.as_ref()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("registry", &self.registry)
            .field("global_notifier", &self.global_notifier().is_some())
            .field("host_notifier", &self.host_notifier.is_some())
            .finish()
    }
}

/// Builder for creating an `Environment`.
///
/// # Example
///
/// ```rust
/// use rules_validator::{Environment, PredicateRegistry, TracingNotifier};
/// use std::sync::Arc;
///
/// let env = Environment::builder()
///     .registry(PredicateRegistry::new())
///     .host_notifier(Arc::new(TracingNotifier))
///     .build();
///
/// assert!(env.registry().is_empty());
/// ```
#[derive(Default)]
pub struct EnvironmentBuilder {
    registry: Option<PredicateRegistry>,
    global_notifier: Option<Arc<dyn Notifier>>,
    host_notifier: Option<Arc<dyn Notifier>>,
}

impl EnvironmentBuilder {
    /// Uses `registry` instead of the built-in seeded default.
    pub fn registry(mut self, registry: PredicateRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the process-wide notifier.
    pub fn global_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.global_notifier = Some(notifier);
        self
    }

    /// Sets the host notifier, the last candidate in the precedence chain.
    pub fn host_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.host_notifier = Some(notifier);
        self
    }

    /// Builds the environment.
    pub fn build(self) -> Environment {
        Environment {
            registry: self.registry.unwrap_or_else(PredicateRegistry::with_builtins),
            global_notifier: RwLock::new(self.global_notifier),
            host_notifier: self.host_notifier,
        }
    }
}
