//! Rewrite filter CLI entry point.
//!
//! Validates and inspects filter configuration. The filter itself is
//! embedded into a host pipeline as a library; this binary lets operators
//! check a rule file before deploying it.

use anyhow::{Context, Result};
use clap::Parser;
use rewrite_filter::{rule::compile_rules, FilterConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rewrite-filter")]
#[command(
    author,
    version,
    about = "Validate and inspect response-rewrite filter configuration"
)]
struct Args {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print example configuration and exit.
    #[arg(long)]
    example_config: bool,
}

fn print_example_config() {
    let example = r#"# Rewrite Filter Configuration Example
#
# Replacements are applied in order: each entry operates on the output of
# the previous one. Bodies and header values of textual responses
# (text/*, application/json, application/xml) are rewritten; everything
# else passes through unchanged.

replacements:
  # Case-insensitive greeting rewrite
  - pattern: "hello"
    replacement: "Hi"
    flags: "i"

  # Hide internal hostnames, keeping the port via a capture group
  - pattern: "internal-host:(\\d+)"
    replacement: "example.com:$1"
"#;
    println!("{}", example);
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    // Print example config if requested
    if args.example_config {
        print_example_config();
        return Ok(());
    }

    // Load configuration
    let config = if let Some(config_path) = &args.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        if config_path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            FilterConfig::from_yaml(&content)?
        } else {
            FilterConfig::from_json(&content)?
        }
    } else {
        FilterConfig::default()
    };

    // Compiling the rule list is the validation: the first invalid pattern
    // aborts with an error naming it.
    let rules = compile_rules(&config.replacements).context("Invalid replacement rules")?;

    info!(rules = rules.len(), "Configuration is valid");

    for (index, rule) in rules.iter().enumerate() {
        info!(
            index,
            pattern = rule.pattern(),
            replacement = rule.replacement(),
            "Rule compiled"
        );
    }

    Ok(())
}
