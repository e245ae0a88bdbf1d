//! # Field Documentation
//!
//! Schema fields are described by long-form markdown text looked up by a
//! dotted key such as `ios.icons.primaryIcon` or `windows.appxManifest`.
//! A missing key means "undocumented", never an error.
//!
//! The schema carries two renditions of each text: the full markdown, and
//! a [`brief`] made of the first paragraph on a single line.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::AppmanError;

/// Source of long-form documentation for schema fields.
pub trait DescriptionProvider {
    /// Returns the markdown text documenting `key`, if any.
    fn get(&self, key: &str) -> Option<&str>;
}

impl DescriptionProvider for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl DescriptionProvider for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

impl<T: DescriptionProvider + ?Sized> DescriptionProvider for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

/// A provider with no documentation at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDescriptions;

impl DescriptionProvider for NoDescriptions {
    fn get(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Documentation loaded from a directory of `<dotted.key>.md` files.
///
/// `docs/ios.bundleIdentifier.md` documents the key `ios.bundleIdentifier`.
/// Files without an `.md` extension and subdirectories are ignored.
#[derive(Debug, Clone, Default)]
pub struct DocsDirectory {
    root: PathBuf,
    entries: BTreeMap<String, String>,
}

impl DocsDirectory {
    /// Load every markdown file directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`AppmanError::Docs`] if the directory or one of its
    /// markdown files cannot be read.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AppmanError> {
        let root = dir.as_ref().to_path_buf();
        let read_dir = std::fs::read_dir(&root).map_err(|e| AppmanError::Docs {
            path: root.display().to_string(),
            reason: format!("cannot read directory: {e}"),
        })?;

        let mut entries = BTreeMap::new();
        for entry in read_dir {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path).map_err(|e| AppmanError::Docs {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            entries.insert(key.to_string(), text.trim_end().to_string());
        }

        tracing::debug!(
            dir = %root.display(),
            count = entries.len(),
            "loaded field documentation"
        );

        Ok(Self { root, entries })
    }

    /// Directory the documentation was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of documented keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no documentation was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Documented keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl DescriptionProvider for DocsDirectory {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Derive the one-line brief of a markdown text.
///
/// Takes everything up to the first blank line and joins its lines with
/// single spaces. Leading blank lines are skipped.
pub fn brief(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}
