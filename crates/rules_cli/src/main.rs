mod commands;
mod notifier;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fre")]
#[command(version, about = "Field Rules Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data records against a rule file
    Check {
        /// Path to the rule file (YAML, TOML or JSON)
        rules: String,

        /// Path to the data file: one record or a list of records (YAML, TOML or JSON)
        data: String,

        /// Patch files merged over the rules, in order
        #[arg(short, long)]
        patch: Vec<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Do not show failure messages
        #[arg(short, long)]
        quiet: bool,
    },

    /// Report rule names that no predicate is registered for
    Lint {
        /// Path to the rule file (YAML, TOML or JSON)
        rules: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List registered predicates
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Check {
            rules,
            data,
            patch,
            format,
            quiet,
        } => commands::check::execute(&rules, &data, &patch, &format, quiet),

        Commands::Lint { rules, format } => commands::lint::execute(&rules, &format),

        Commands::Rules => commands::rules::execute(),
    }
}
