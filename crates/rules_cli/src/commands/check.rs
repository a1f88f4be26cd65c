use anyhow::{Context, Result};
use rules_parser::{parse_file, parse_records_file};
use rules_validator::RuleValidator;
use std::path::Path;
use tracing::{debug, info};

use crate::output::{self, RecordOutcome};

pub fn execute(
    rules_path: &str,
    data_path: &str,
    patches: &[String],
    format: &str,
    quiet: bool,
) -> Result<()> {
    info!("Checking data: {}", data_path);
    info!("Rule file: {}", rules_path);

    let file = parse_file(Path::new(rules_path))
        .with_context(|| format!("Failed to parse rule file: {}", rules_path))?;

    let mut validator = RuleValidator::with_environment(super::environment(), file.rule_set());
    if let Some(names) = file.removals() {
        validator
            .remove_rules_value(names)
            .with_context(|| format!("Invalid 'remove' entry in {}", rules_path))?;
    }

    for patch_path in patches {
        debug!("Applying patch: {}", patch_path);
        let patch = parse_file(Path::new(patch_path))
            .with_context(|| format!("Failed to parse patch file: {}", patch_path))?;

        validator.add_rules(patch.rule_set());
        if let Some(names) = patch.removals() {
            validator
                .remove_rules_value(names)
                .with_context(|| format!("Invalid 'remove' entry in {}", patch_path))?;
        }
    }

    let records = parse_records_file(Path::new(data_path))
        .with_context(|| format!("Failed to parse data file: {}", data_path))?;

    let text = format != "json";
    if text {
        output::print_info(&format!(
            "Loaded rules for {} fields, {} records to check",
            validator.rules().rules.len(),
            records.len()
        ));
    }

    let mut outcomes = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let failure = validator.first_failure(record);

        // text output reports messages through the console notifier
        if let Some(failure) = failure.as_ref().filter(|_| text && !quiet) {
            validator
                .notify_failure(failure, None)
                .with_context(|| format!("Failed to report record {}", index + 1))?;
        }

        outcomes.push(RecordOutcome { index, failure });
    }

    output::print_check_report(&outcomes, format);

    if outcomes.iter().any(|outcome| !outcome.passed()) {
        std::process::exit(1);
    }

    Ok(())
}
