//! # Diagnostics
//!
//! Validation failures are reported as plain lines:
//!
//! ```text
//! app.json: error: app.json is not a valid app manifest
//! app.json: error: /resources must NOT have duplicate items
//! ```
//!
//! Lines go to a [`DiagnosticSink`]; success writes nothing.

use std::path::Path;

use crate::violation::Violation;

/// Receives diagnostic lines.
pub trait DiagnosticSink {
    /// Report one error line.
    fn error(&mut self, line: String);
}

/// Writes each line to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn error(&mut self, line: String) {
        eprintln!("{line}");
    }
}

/// Keeps lines in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectingSink {
    lines: Vec<String>,
}

impl CollectingSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines reported so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the sink, returning its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl DiagnosticSink for CollectingSink {
    fn error(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// Reported when no manifest file was found.
pub const NOT_FOUND_MESSAGE: &str = "error: could not locate the manifest file";

/// `<path>: error: <message>`
pub fn error_line(path: &Path, message: impl std::fmt::Display) -> String {
    format!("{}: error: {message}", path.display())
}

/// Header preceding the violations of an invalid manifest.
pub fn header_line(path: &Path) -> String {
    error_line(path, format_args!("{} is not a valid app manifest", path.display()))
}

/// `<path>: error: <pointer> <reason>`
pub fn violation_line(path: &Path, violation: &Violation) -> String {
    error_line(path, violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::JsonPointer;

    #[test]
    fn line_shapes() {
        let path = Path::new("example/app.json");
        assert_eq!(
            header_line(path),
            "example/app.json: error: example/app.json is not a valid app manifest"
        );

        let violation = Violation {
            instance_path: JsonPointer::parse("/resources"),
            schema_path: JsonPointer::parse("/properties/resources/oneOf/0/uniqueItems"),
            keyword: "uniqueItems".to_string(),
            message: "must NOT have duplicate items".to_string(),
        };
        assert_eq!(
            violation_line(path, &violation),
            "example/app.json: error: /resources must NOT have duplicate items"
        );
    }

    #[test]
    fn collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.error("first".to_string());
        sink.error("second".to_string());
        assert_eq!(sink.lines(), ["first", "second"]);
        assert_eq!(sink.into_lines().len(), 2);
    }
}
