use colored::*;
use rules_core::RuleFailure;
use rules_validator::UnknownRule;
use serde_json::json;

/// Outcome of validating one record.
pub struct RecordOutcome {
    /// Position of the record in the data file
    pub index: usize,
    /// First failing rule, if any
    pub failure: Option<RuleFailure>,
}

impl RecordOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

pub fn print_check_report(outcomes: &[RecordOutcome], format: &str) {
    match format {
        "json" => print_json_check_report(outcomes),
        _ => print_text_check_report(outcomes),
    }
}

fn print_text_check_report(outcomes: &[RecordOutcome]) {
    let failed = outcomes.iter().filter(|o| !o.passed()).count();

    println!("\n{}", "═".repeat(60));
    println!("{}", "  CHECK REPORT".bold());
    println!("{}", "═".repeat(60));

    if failed == 0 {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "All records PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    println!("\n{}", "Records:".bold());
    for outcome in outcomes {
        match &outcome.failure {
            None => println!("  {}. {}", outcome.index + 1, "passed".green()),
            Some(failure) => println!(
                "  {}. {} {}",
                outcome.index + 1,
                "failed".red(),
                format!(
                    "field '{}', rule '{}', value '{}'",
                    failure.field, failure.rule, failure.value
                )
                .red()
            ),
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total records:  {}", outcomes.len());
    println!("  Failed records: {}", failed);
    println!("{}", "═".repeat(60));
}

fn print_json_check_report(outcomes: &[RecordOutcome]) {
    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    let records: Vec<_> = outcomes
        .iter()
        .map(|outcome| {
            json!({
                "index": outcome.index,
                "passed": outcome.passed(),
                "failure": outcome.failure.as_ref().map(|failure| json!({
                    "name": failure.field,
                    "value": failure.value,
                    "param": failure.param,
                    "rule": failure.rule,
                    "msg": failure.message,
                })),
            })
        })
        .collect();

    let output = json!({
        "passed": failed == 0,
        "records": records,
        "summary": {
            "total": outcomes.len(),
            "failed": failed,
        }
    });

    print_json(&output);
}

pub fn print_lint_report(unknown: &[UnknownRule], format: &str) {
    if format == "json" {
        let entries: Vec<_> = unknown
            .iter()
            .map(|entry| json!({ "field": entry.field, "rule": entry.rule }))
            .collect();
        print_json(&json!({ "passed": unknown.is_empty(), "unknown_rules": entries }));
        return;
    }

    if unknown.is_empty() {
        print_success("Every rule is registered");
        return;
    }

    println!("\n{}", "Unknown rules:".yellow().bold());
    for (i, entry) in unknown.iter().enumerate() {
        println!(
            "  {}. {}",
            i + 1,
            format!("'{}' on field '{}'", entry.rule, entry.field).yellow()
        );
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => print_error(&format!("Failed to render JSON: {}", err)),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
