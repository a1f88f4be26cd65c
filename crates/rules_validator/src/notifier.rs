//! Failure notification.
//!
//! A failing rule with a configured message is reported to exactly one
//! notifier, chosen by precedence:
//!
//! 1. the notifier passed to the individual `check_data` call,
//! 2. the validator's own `on_message` notifier,
//! 3. the environment's process-wide notifier,
//! 4. the environment's host notifier (installed by the application).
//!
//! The first one present wins; the rest are never consulted.

use rules_core::{FailureReport, NotifyError};
use tracing::{debug, warn};

/// Result returned by notifiers.
pub type NotifyResult = Result<(), NotifyError>;

/// Turns a failure report into something a user sees.
pub trait Notifier: Send + Sync {
    /// Reports a validation failure.
    fn notify(&self, report: &FailureReport) -> NotifyResult;
}

impl<F> Notifier for F
where
    F: Fn(&FailureReport) -> NotifyResult + Send + Sync,
{
    fn notify(&self, report: &FailureReport) -> NotifyResult {
        self(report)
    }
}

/// Host notifier that logs the message through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, report: &FailureReport) -> NotifyResult {
        warn!(
            field = %report.name,
            rule = %report.rule,
            value = %report.value,
            "{}",
            report.msg
        );
        Ok(())
    }
}

/// Ordered notifier candidates for a single dispatch.
pub struct NotifierChain<'a> {
    candidates: [Option<&'a dyn Notifier>; 4],
}

impl<'a> NotifierChain<'a> {
    /// Builds the chain in precedence order.
    pub fn new(
        per_call: Option<&'a dyn Notifier>,
        instance: Option<&'a dyn Notifier>,
        global: Option<&'a dyn Notifier>,
        host: Option<&'a dyn Notifier>,
    ) -> Self {
        Self {
            candidates: [per_call, instance, global, host],
        }
    }

    /// The notifier that would receive a report, if any.
    pub fn resolve(&self) -> Option<&'a dyn Notifier> {
        self.candidates.iter().flatten().next().copied()
    }

    /// Sends `report` to the first available notifier and returns its result.
    ///
    /// Returns `Ok(false)` when no notifier is configured at all.
    pub fn dispatch(&self, report: &FailureReport) -> Result<bool, NotifyError> {
        match self.resolve() {
            Some(notifier) => {
                notifier.notify(report)?;
                Ok(true)
            }
            None => {
                debug!(
                    "No notifier configured, dropping message for '{}' ({})",
                    report.name, report.rule
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rules_core::Value;
    use std::sync::Mutex;

    fn report() -> FailureReport {
        FailureReport {
            name: "age".to_string(),
            value: Value::missing(),
            param: vec![Value::Bool(true)],
            rule: "required".to_string(),
            msg: "Age is required".to_string(),
        }
    }

    struct Recorder {
        label: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, report: &FailureReport) -> NotifyResult {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, report.msg));
            Ok(())
        }
    }

    #[test]
    fn test_precedence_order() {
        let per_call = Recorder::new("call");
        let instance = Recorder::new("instance");
        let global = Recorder::new("global");
        let host = Recorder::new("host");

        let chain = NotifierChain::new(
            Some(&per_call),
            Some(&instance),
            Some(&global),
            Some(&host),
        );
        assert!(chain.dispatch(&report()).unwrap());
        assert_eq!(per_call.calls(), vec!["call:Age is required"]);
        assert!(instance.calls().is_empty());

        let chain = NotifierChain::new(None, None, Some(&global), Some(&host));
        chain.dispatch(&report()).unwrap();
        assert_eq!(global.calls(), vec!["global:Age is required"]);
        assert!(host.calls().is_empty());

        let chain = NotifierChain::new(None, None, None, Some(&host));
        chain.dispatch(&report()).unwrap();
        assert_eq!(host.calls(), vec!["host:Age is required"]);
    }

    #[test]
    fn test_empty_chain_is_a_no_op() {
        let chain = NotifierChain::new(None, None, None, None);
        assert!(chain.resolve().is_none());
        assert!(!chain.dispatch(&report()).unwrap());
    }

    #[test]
    fn test_closure_notifier_error_propagates() {
        let failing = |_: &FailureReport| -> NotifyResult { Err(NotifyError::new("no display")) };
        let chain = NotifierChain::new(Some(&failing), None, None, None);

        let err = chain.dispatch(&report()).unwrap_err();
        assert_eq!(err.message(), "no display");
    }

    #[test]
    fn test_tracing_notifier_succeeds() {
        assert!(TracingNotifier.notify(&report()).is_ok());
    }
}
