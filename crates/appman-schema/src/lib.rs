//! # appman-schema: App Manifest Schema & Validation
//!
//! Builds the JSON Schema (Draft 2020-12) describing an app manifest and
//! validates manifest files against it.
//!
//! ## Schema Construction (`builder`)
//!
//! [`build_schema`] assembles the schema from code. Field descriptions
//! come from a [`DescriptionProvider`](appman_core::DescriptionProvider);
//! each platform's `reactNativePath` description is generated from the
//! platform's default package. The same inputs always produce the same
//! bytes, so generated artifacts downstream are reproducible.
//!
//! ## Schema Registry (`document`)
//!
//! [`SchemaDocument`] keeps reusable sub-schemas under `$defs` and refers
//! to them by name. References are resolved on demand, never inlined.
//!
//! ## Validation (`validate`)
//!
//! [`ManifestValidator`] compiles the schema once and turns raw
//! validation errors into [`Violation`]s with stable messages. The
//! violations are written to a [`DiagnosticSink`] and classified into an
//! [`ErrorCode`](appman_core::ErrorCode): `1003` when anything under
//! `/resources` is wrong, `1001` otherwise.
//!
//! ## Crate Policy
//!
//! - Depends only on `appman-core` internally.
//! - Validation is a gate: a valid manifest is returned exactly as parsed.
//! - Failures never escape as panics; the return value encodes them.

pub mod builder;
pub mod diagnostic;
pub mod document;
pub mod validate;
pub mod violation;

pub use builder::build_schema;
pub use diagnostic::{CollectingSink, DiagnosticSink, StderrSink};
pub use document::SchemaDocument;
pub use validate::{validate_manifest, ManifestValidator, SchemaError};
pub use violation::{classify, JsonPointer, Violation, ViolationCategory};
