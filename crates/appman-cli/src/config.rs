//! # CLI Configuration
//!
//! Optional YAML file passed with the global `--config` flag:
//!
//! ```yaml
//! manifest: app.json
//! docs_dir: docs
//! platform_defaults:
//!   macos: react-native-macos
//! ```
//!
//! Every key is optional. A relative `docs_dir` is resolved against the
//! directory containing the configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use appman_core::{
    DescriptionProvider, DocsDirectory, NoDescriptions, PlatformDefaults,
    DEFAULT_MANIFEST_FILENAME,
};

/// Settings read from the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// File name searched for by `appman validate`.
    pub manifest: Option<String>,

    /// Directory of `<dotted.key>.md` field documentation.
    pub docs_dir: Option<PathBuf>,

    /// Overrides of the built-in `reactNativePath` default packages.
    pub platform_defaults: PlatformDefaults,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            docs_dir: None,
            platform_defaults: PlatformDefaults::empty(),
            base_dir: None,
        }
    }
}

impl CliConfig {
    /// Load the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise return the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// The manifest file name the locator searches for.
    pub fn manifest_name(&self) -> &str {
        self.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST_FILENAME)
    }

    /// Built-in platform defaults with the configured overrides applied.
    pub fn platform_defaults(&self) -> PlatformDefaults {
        let mut defaults = PlatformDefaults::default();
        defaults.merge(&self.platform_defaults);
        defaults
    }

    /// The documentation directory, resolved against the config file.
    pub fn docs_path(&self) -> Option<PathBuf> {
        let dir = self.docs_dir.as_ref()?;
        Some(match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.clone(),
        })
    }

    /// Field documentation for the schema builder.
    ///
    /// Without a configured `docs_dir` every field keeps its inline
    /// description.
    pub fn descriptions(&self) -> Result<Box<dyn DescriptionProvider>> {
        match self.docs_path() {
            Some(dir) => {
                let docs = DocsDirectory::load(&dir)
                    .with_context(|| format!("failed to load field docs from {}", dir.display()))?;
                tracing::info!(dir = %dir.display(), entries = docs.len(), "loaded field docs");
                Ok(Box::new(docs))
            }
            None => Ok(Box::new(NoDescriptions)),
        }
    }
}
