use anyhow::{Context, Result};
use rules_parser::parse_file;
use rules_validator::RuleValidator;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(rules_path: &str, format: &str) -> Result<()> {
    info!("Linting rule file: {}", rules_path);

    let file = parse_file(Path::new(rules_path))
        .with_context(|| format!("Failed to parse rule file: {}", rules_path))?;

    let validator = RuleValidator::with_environment(super::environment(), file.rule_set());
    let unknown = validator.unknown_rules();

    output::print_lint_report(unknown, format);

    if !unknown.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
