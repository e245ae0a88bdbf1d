//! # Error Types: Result Codes and Error Hierarchy
//!
//! Two kinds of failure live here:
//!
//! - [`ErrorCode`] is the closed set of numeric result codes handed to
//!   scripting consumers. A manifest that cannot be found or does not
//!   validate is reported through one of these codes, never through a
//!   panic or an opaque error.
//! - [`AppmanError`] covers operational failures of the tooling itself
//!   (unreadable documentation directories, malformed JSON handed to the
//!   typed model, and so on).

use std::fmt;

use thiserror::Error;

/// Stable numeric result codes for manifest lookup and validation.
///
/// Success is not a variant: a successful validation returns the manifest
/// itself. The numeric values are a contract with CLI wrappers and must
/// never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// The manifest file could not be located, so no schema evaluation ran.
    NotFound,
    /// The manifest is not valid JSON or violates the schema outside `/resources`.
    Schema,
    /// At least one schema violation is rooted under `/resources`.
    Resources,
}

impl ErrorCode {
    /// All result codes, in ascending numeric order.
    pub const ALL: [ErrorCode; 3] = [ErrorCode::NotFound, ErrorCode::Schema, ErrorCode::Resources];

    /// The numeric code reported to callers.
    pub fn code(self) -> i32 {
        match self {
            Self::NotFound => 1,
            Self::Schema => 1001,
            Self::Resources => 1003,
        }
    }

    /// Look up a result code by its numeric value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// The process exit status for this code.
    ///
    /// POSIX keeps only the low 8 bits of an exit status, so `1001` and
    /// `1003` surface as `233` and `235`. They stay distinct from each
    /// other and from `1`.
    pub fn exit_status(self) -> u8 {
        (self.code() & 0xff) as u8
    }

    /// Short symbolic name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::NotFound => "E_NOT_FOUND",
            Self::Schema => "E_SCHEMA",
            Self::Resources => "E_RESOURCES",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Top-level error type for appman tooling.
#[derive(Error, Debug)]
pub enum AppmanError {
    /// A documentation directory could not be loaded.
    #[error("failed to load documentation from {path}: {reason}")]
    Docs {
        /// Directory or file that failed to load.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A manifest value could not be converted into the typed model.
    #[error("manifest model error: {0}")]
    Model(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
