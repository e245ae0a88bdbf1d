//! # Manifest Discovery
//!
//! Finds a file by walking from a starting directory up to the filesystem
//! root. Each ancestor is probed only after its child came up empty, and
//! the search never writes to disk.

use std::path::{Path, PathBuf};

/// File name of an app manifest.
pub const DEFAULT_MANIFEST_FILENAME: &str = "app.json";

/// Search for `filename` in `start` and then in each of its ancestors.
///
/// When `start` is `None` the search begins in the current working
/// directory. Relative starting points are resolved against it as well.
/// Paths that cannot be inspected (missing, permission denied) count as
/// absent. Returns the first match, or `None` once the root is passed.
pub fn find_file(filename: &str, start: Option<&Path>) -> Option<PathBuf> {
    let start = match start {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => std::env::current_dir().ok()?.join(dir),
        None => std::env::current_dir().ok()?,
    };

    let mut dir = Some(start.as_path());
    while let Some(current) = dir {
        let candidate = current.join(filename);
        if std::fs::metadata(&candidate).is_ok() {
            tracing::debug!(path = %candidate.display(), "found file");
            return Some(candidate);
        }
        tracing::trace!(dir = %current.display(), filename, "not found, ascending");
        dir = current.parent();
    }

    tracing::debug!(filename, start = %start.display(), "reached filesystem root");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_file_in_start_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("app.json");
        std::fs::write(&manifest, "{}").unwrap();

        assert_eq!(find_file("app.json", Some(dir.path())), Some(manifest));
    }

    #[test]
    fn finds_file_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("app.json");
        std::fs::write(&manifest, "{}").unwrap();
        let deep = dir.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_file("app.json", Some(deep.as_path())), Some(manifest));
    }

    #[test]
    fn nearest_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.json"), "{}").unwrap();
        let nested = dir.path().join("packages").join("example");
        std::fs::create_dir_all(nested.join("src")).unwrap();
        std::fs::write(nested.join("app.json"), "{}").unwrap();

        assert_eq!(
            find_file("app.json", Some(nested.join("src").as_path())),
            Some(nested.join("app.json"))
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let name = "appman-locate-test-missing-7f3a9c.json";
        assert_eq!(find_file(name, Some(dir.path())), None);
    }
}
