//! # Validate Subcommand
//!
//! Locates an app manifest and validates it against the generated schema.
//!
//! ```bash
//! appman validate                      # search app.json upwards from cwd
//! appman validate path/to/app.json
//! appman validate --start-dir node_modules/some-package
//! ```
//!
//! Diagnostics go to stderr. The exit status is `0` for a valid manifest
//! and the low byte of the result code otherwise.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use appman_core::find_file;
use appman_schema::{DiagnosticSink, ManifestValidator, StderrSink};

use crate::config::CliConfig;
use crate::resolve_path;

/// Arguments for the `appman validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest to validate. When omitted the manifest is searched for.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory the search starts from (default: current directory).
    #[arg(long, value_name = "DIR", conflicts_with = "path")]
    pub start_dir: Option<PathBuf>,

    /// File name to search for (default: app.json).
    #[arg(long, value_name = "NAME", conflicts_with = "path")]
    pub manifest: Option<String>,
}

/// Execute the validate subcommand.
///
/// Returns the process exit status.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig, cwd: &Path) -> Result<u8> {
    let validator = ManifestValidator::shared().context("failed to compile manifest schema")?;
    let path = manifest_path(args, config, cwd);
    Ok(validate_with(validator, path.as_deref(), &mut StderrSink))
}

/// The manifest named on the command line, or the one found by searching.
pub fn manifest_path(args: &ValidateArgs, config: &CliConfig, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = &args.path {
        return Some(resolve_path(path, cwd));
    }
    let name = args.manifest.as_deref().unwrap_or(config.manifest_name());
    let start = args
        .start_dir
        .as_deref()
        .map(|dir| resolve_path(dir, cwd))
        .unwrap_or_else(|| cwd.to_path_buf());
    tracing::debug!(manifest = name, start = %start.display(), "searching for manifest");
    find_file(name, Some(start.as_path()))
}

/// Validate `path` and map the outcome to an exit status.
pub fn validate_with(
    validator: &ManifestValidator,
    path: Option<&Path>,
    sink: &mut dyn DiagnosticSink,
) -> u8 {
    match validator.validate_file(path, sink) {
        Ok(_) => {
            if let Some(path) = path {
                tracing::info!(path = %path.display(), "manifest is valid");
            }
            0
        }
        Err(code) => {
            tracing::info!(code = code.code(), kind = code.name(), "validation failed");
            code.exit_status()
        }
    }
}
