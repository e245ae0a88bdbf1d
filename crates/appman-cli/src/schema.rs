//! # Schema Subcommand
//!
//! Writes the generated app manifest JSON Schema, enriched with the
//! configured field documentation, to a file or stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use appman_schema::build_schema;

use crate::config::CliConfig;
use crate::resolve_path;

/// Arguments for the `appman schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Write the schema to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, config: &CliConfig, cwd: &Path) -> Result<u8> {
    let text = render_schema(config)?;
    match &args.output {
        Some(output) => {
            let output = resolve_path(output, cwd);
            std::fs::write(&output, &text)
                .with_context(|| format!("failed to write schema to {}", output.display()))?;
            tracing::info!(path = %output.display(), bytes = text.len(), "wrote schema");
        }
        None => {
            std::io::stdout()
                .lock()
                .write_all(text.as_bytes())
                .context("failed to write schema to stdout")?;
        }
    }
    Ok(0)
}

/// The schema as pretty-printed JSON.
pub fn render_schema(config: &CliConfig) -> Result<String> {
    let descriptions = config.descriptions()?;
    let schema = build_schema(&*descriptions, &config.platform_defaults());
    schema.to_pretty_json().context("failed to serialize schema")
}
