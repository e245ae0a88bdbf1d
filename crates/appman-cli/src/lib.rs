//! # appman-cli: App Manifest Command-Line Interface
//!
//! Thin clap front end over `appman-schema`.
//!
//! ## Subcommands
//!
//! - `validate`: locate and validate an `app.json`
//! - `schema`: print or write the generated JSON Schema
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to the library crates and return the
//!   process exit status.

pub mod config;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path relative to the working directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
