//! # Violations
//!
//! A [`Violation`] is one reason a manifest failed validation, located by
//! a parsed [`JsonPointer`]. Classification into result codes inspects
//! pointer segments, never message text.

use std::fmt;

use appman_core::ErrorCode;

/// A JSON Pointer (RFC 6901) held as unescaped segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the textual form (`""`, `"/a/b"`, `"/a~1b"`).
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split('/')
            .skip(1)
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect();
        Self { segments }
    }

    /// Build a pointer from unescaped segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The unescaped segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true for the root pointer.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment, if any.
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true if this pointer equals `prefix` or lies beneath it.
    pub fn starts_with(&self, prefix: &JsonPointer) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// A new pointer one segment deeper.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Append all of `other`'s segments.
    pub fn join(&self, other: &JsonPointer) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Diagnostic label: the pointer text, or `<root>` for the root.
    pub fn label(&self) -> String {
        if self.is_root() {
            "<root>".to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// The class of a violation, derived from where it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCategory {
    /// The offending node is `/resources` or lies beneath it.
    Resources,
    /// Anything else, including unparseable input.
    Structure,
}

impl ViolationCategory {
    /// Categorise a location in the manifest.
    pub fn of(pointer: &JsonPointer) -> Self {
        match pointer.first() {
            Some("resources") => Self::Resources,
            _ => Self::Structure,
        }
    }

    /// The result code for a failure of this category.
    pub fn error_code(self) -> ErrorCode {
        match self {
            Self::Resources => ErrorCode::Resources,
            Self::Structure => ErrorCode::Schema,
        }
    }
}

/// One reason a manifest is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the offending node in the manifest.
    pub instance_path: JsonPointer,
    /// Location of the failing keyword in the schema.
    pub schema_path: JsonPointer,
    /// The failing schema keyword (`required`, `type`, ...).
    pub keyword: String,
    /// Human-readable reason.
    pub message: String,
}

impl Violation {
    /// The category this violation falls into.
    pub fn category(&self) -> ViolationCategory {
        ViolationCategory::of(&self.instance_path)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.instance_path.label(), self.message)
    }
}

/// Map a set of violations to a single result code.
///
/// Any violation under `/resources` makes the result [`ErrorCode::Resources`],
/// however many other violations accompany it.
pub fn classify(violations: &[Violation]) -> ErrorCode {
    if violations
        .iter()
        .any(|v| v.category() == ViolationCategory::Resources)
    {
        ViolationCategory::Resources.error_code()
    } else {
        ViolationCategory::Structure.error_code()
    }
}
