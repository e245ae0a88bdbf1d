//! # appman CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use appman_cli::config::CliConfig;
use appman_cli::schema::{run_schema, SchemaArgs};
use appman_cli::validate::{run_validate, ValidateArgs};

/// App manifest toolchain.
///
/// Locates and validates `app.json` manifests and generates the JSON Schema
/// they are checked against.
#[derive(Parser, Debug)]
#[command(name = "appman", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an app manifest against the schema.
    Validate(ValidateArgs),

    /// Print or write the app manifest JSON Schema.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "appman starting");

    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!("cannot read current directory: {e}");
        PathBuf::from(".")
    });

    let result = CliConfig::load_optional(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Validate(args) => run_validate(&args, &config, &cwd),
            Commands::Schema(args) => run_schema(&args, &config, &cwd),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
