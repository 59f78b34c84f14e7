//! CPE Command Line Interface
//!
//! Parses CPE names in either binding and compares them.
//!
//! # Usage
//!
//! ```bash
//! # Show the WFN and both bindings of a name
//! cpe parse 'cpe:/a:microsoft:internet_explorer:8.0.6001:beta'
//!
//! # Compare two names attribute by attribute
//! cpe compare 'cpe:2.3:a:microsoft:*:*:*:*:*:*:*:*:*' 'cpe:/a:microsoft:windows_7'
//! ```
//!
//! Set `RUST_LOG=debug` to see why a name was rejected.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cpe_name::{compare_wfns, Comparison, WellFormedName};
use serde_json::json;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpe")]
#[command(version)]
#[command(about = "Parse, convert and compare CPE 2.3 names")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a URI or formatted string and print its WFN and bindings
    Parse {
        /// CPE 2.2 URI or CPE 2.3 formatted string
        name: String,
    },

    /// Compare a source name against a target name
    Compare {
        /// Source name, may contain wildcards
        source: String,

        /// Target name
        target: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Parse { name } => cmd_parse(name, cli.format),
        Commands::Compare { source, target } => cmd_compare(source, target, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_name(name: &str) -> Result<WellFormedName> {
    name.parse::<WellFormedName>()
        .with_context(|| format!("failed to parse {:?}", name))
}

fn cmd_parse(name: &str, format: OutputFormat) -> Result<()> {
    let wfn = parse_name(name)?;

    match format {
        OutputFormat::Json => {
            let values: serde_json::Map<_, _> = wfn
                .iter()
                .map(|(attribute, value)| (attribute.to_string(), json!(value.to_string())))
                .collect();
            let output = json!({
                "wfn": values,
                "uri": wfn.to_uri(),
                "formatted_string": wfn.to_formatted_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("WFN:  {}", wfn);
            println!("URI:  {}", wfn.to_uri());
            println!("FS:   {}", wfn.to_formatted_string());
        }
    }

    Ok(())
}

fn cmd_compare(source: &str, target: &str, format: OutputFormat) -> Result<()> {
    let source = parse_name(source)?;
    let target = parse_name(target)?;
    let comparison = compare_wfns(&source, &target);

    match format {
        OutputFormat::Json => {
            let output = json!({
                "source": source,
                "target": target,
                "relations": comparison,
                "disjoint": comparison.is_disjoint(),
                "equal": comparison.is_equal(),
                "subset": comparison.is_subset(),
                "superset": comparison.is_superset(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_comparison(&comparison),
    }

    Ok(())
}

fn print_comparison(comparison: &Comparison) {
    for (attribute, relation) in comparison.iter() {
        println!("{:<12} {}", attribute.as_str(), relation);
    }
    println!();
    println!("disjoint:  {}", comparison.is_disjoint());
    println!("equal:     {}", comparison.is_equal());
    println!("subset:    {}", comparison.is_subset());
    println!("superset:  {}", comparison.is_superset());
}
