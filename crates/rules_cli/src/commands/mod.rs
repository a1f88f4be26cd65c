pub mod check;
pub mod lint;
pub mod rules;

use rules_validator::Environment;
use std::sync::Arc;

use crate::notifier::ConsoleNotifier;

/// Environment used by every command: built-in predicates, console output
/// as the host notifier.
pub fn environment() -> Arc<Environment> {
    Arc::new(
        Environment::builder()
            .host_notifier(Arc::new(ConsoleNotifier))
            .build(),
    )
}
