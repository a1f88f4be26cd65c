use colored::*;
use rules_core::FailureReport;
use rules_validator::{Notifier, NotifyResult};

/// Host notifier printing failure messages to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, report: &FailureReport) -> NotifyResult {
        eprintln!(
            "  {} {} {}",
            "✗".red().bold(),
            format!("{} ({}):", report.name, report.rule).bold(),
            report.msg.red()
        );
        Ok(())
    }
}
