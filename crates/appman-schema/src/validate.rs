//! # Manifest Validation
//!
//! Reads a manifest file, validates it against the generated schema, and
//! reports what is wrong.
//!
//! ## Flow
//!
//! 1. No path: report that the manifest could not be located, code `1`.
//! 2. Unparseable JSON (including invalid UTF-8): report the parse error,
//!    code `1001`.
//! 3. Schema violations: report a header plus one line per violation, in
//!    the order the schema engine found them; code `1003` if any of them
//!    is under `/resources`, else `1001`.
//! 4. Valid: return the parsed value untouched.
//!
//! ## Messages
//!
//! Raw engine errors are rewritten into short, stable reasons keyed by the
//! failing schema keyword (`must have required property 'name'`,
//! `must be array`, `must NOT have duplicate items`, ...). A failed
//! `oneOf` is replaced by the failures of the branches that plausibly
//! apply, see [`ManifestValidator::expand_one_of`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use thiserror::Error;

use appman_core::{DescriptionProvider, ErrorCode, Manifest, NoDescriptions, PlatformDefaults};

use crate::builder::build_schema;
use crate::diagnostic::{error_line, header_line, violation_line, DiagnosticSink, NOT_FOUND_MESSAGE};
use crate::document::SchemaDocument;
use crate::violation::{classify, JsonPointer, Violation};

/// Errors raised while preparing the validator.
///
/// These indicate a broken schema, not a broken manifest.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema could not be compiled.
    #[error("failed to compile schema: {reason}")]
    Compile {
        /// Human-readable reason.
        reason: String,
    },

    /// The schema refers to a definition it does not contain.
    #[error("unresolved schema reference: {0}")]
    UnresolvedReference(String),
}

fn compile(schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .build(schema)
        .map_err(|e| SchemaError::Compile {
            reason: e.to_string(),
        })
}

/// A compiled app manifest validator.
///
/// Immutable after construction; share it freely between threads.
pub struct ManifestValidator {
    schema: SchemaDocument,
    validator: Validator,
    /// Compiled alternatives of every `oneOf`, keyed by its location in
    /// the document.
    branches: HashMap<JsonPointer, Vec<Validator>>,
}

impl std::fmt::Debug for ManifestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestValidator")
            .field("definitions", &self.schema.definition_names())
            .field("one_of", &self.branches.len())
            .finish()
    }
}

static SHARED: OnceLock<Result<ManifestValidator, String>> = OnceLock::new();

impl ManifestValidator {
    /// Build the schema from `descriptions` and `platform_defaults` and
    /// compile it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the generated schema does not compile.
    pub fn new(
        descriptions: &dyn DescriptionProvider,
        platform_defaults: &PlatformDefaults,
    ) -> Result<Self, SchemaError> {
        Self::from_document(build_schema(descriptions, platform_defaults))
    }

    /// Compile an existing schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnresolvedReference`] if a `$ref` points at a
    /// missing definition, or [`SchemaError::Compile`] if the engine
    /// rejects the schema.
    pub fn from_document(schema: SchemaDocument) -> Result<Self, SchemaError> {
        if let Some(reference) = schema.unresolved_refs().into_iter().next() {
            return Err(SchemaError::UnresolvedReference(reference));
        }
        let validator = compile(schema.as_value())?;

        let mut branches = HashMap::new();
        for location in schema.locations_of("oneOf") {
            let Some(Value::Array(alternatives)) = schema.as_value().pointer(&location.to_string())
            else {
                continue;
            };
            let compiled = alternatives
                .iter()
                .map(|branch| compile(&schema.standalone(branch)))
                .collect::<Result<Vec<_>, _>>()?;
            branches.insert(location, compiled);
        }

        tracing::debug!(
            definitions = schema.definition_names().len(),
            one_of = branches.len(),
            "compiled app manifest schema"
        );
        Ok(Self {
            schema,
            validator,
            branches,
        })
    }

    /// The process-wide validator without field documentation.
    ///
    /// Built on first use and reused afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the schema failed to compile.
    pub fn shared() -> Result<&'static ManifestValidator, SchemaError> {
        SHARED
            .get_or_init(|| {
                Self::new(&NoDescriptions, &PlatformDefaults::default()).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|reason| SchemaError::Compile {
                reason: reason.clone(),
            })
    }

    /// The schema this validator enforces.
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    /// Check a parsed manifest.
    ///
    /// # Errors
    ///
    /// Returns every violation, in the order the schema engine reports them.
    pub fn validate_value(&self, manifest: &Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        for error in self.validator.iter_errors(manifest) {
            self.convert(manifest, &error, &JsonPointer::root(), &JsonPointer::root(), &mut violations);
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Read, parse and validate the manifest at `path`.
    ///
    /// `None` means the manifest could not be located. Problems are written
    /// to `sink`; the returned code tells them apart.
    pub fn validate_file(
        &self,
        path: Option<&Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Value, ErrorCode> {
        let Some(path) = path else {
            sink.error(NOT_FOUND_MESSAGE.to_string());
            return Err(ErrorCode::NotFound);
        };

        // Invalid UTF-8 surfaces as a JSON parse error.
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot read manifest");
                sink.error(error_line(path, e));
                return Err(ErrorCode::NotFound);
            }
        };

        let manifest: Value = match serde_json::from_slice(&content) {
            Ok(value) => value,
            Err(e) => {
                sink.error(error_line(path, e));
                return Err(ErrorCode::Schema);
            }
        };

        match self.validate_value(&manifest) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "manifest is valid");
                Ok(manifest)
            }
            Err(violations) => {
                let code = classify(&violations);
                tracing::debug!(
                    path = %path.display(),
                    violations = violations.len(),
                    code = code.code(),
                    "manifest is invalid"
                );
                sink.error(header_line(path));
                for violation in &violations {
                    sink.error(violation_line(path, violation));
                }
                Err(code)
            }
        }
    }

    /// Validate the manifest at `path` and convert it to the typed model.
    pub fn validate_typed(
        &self,
        path: Option<&Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Manifest, ErrorCode> {
        let value = self.validate_file(path, sink)?;
        Manifest::from_value(&value).map_err(|e| {
            if let Some(path) = path {
                sink.error(error_line(path, e));
            }
            ErrorCode::Schema
        })
    }

    fn convert(
        &self,
        root: &Value,
        error: &ValidationError<'_>,
        instance_base: &JsonPointer,
        schema_base: &JsonPointer,
        out: &mut Vec<Violation>,
    ) {
        let instance_path =
            instance_base.join(&JsonPointer::parse(&error.instance_path.to_string()));
        let schema_path = schema_base.join(&JsonPointer::parse(&error.schema_path.to_string()));
        let keyword = schema_path.last().unwrap_or_default().to_string();

        if keyword == "oneOf" && matches!(error.kind, ValidationErrorKind::OneOfNotValid { .. }) {
            out.extend(self.expand_one_of(root, &instance_path, &schema_path));
            return;
        }

        let message = self.reason(error, &keyword, &schema_path);
        out.push(Violation {
            instance_path,
            schema_path,
            keyword,
            message,
        });
    }

    /// Explain a failed `oneOf` through its branches.
    ///
    /// Each branch is validated on its own against the offending node,
    /// using the validators compiled alongside the schema. A
    /// branch whose only complaint is a type mismatch at the node itself
    /// describes a different shape altogether; those are dropped when any
    /// other branch got past its type check. When every branch failed on
    /// type, one type error per branch is reported.
    fn expand_one_of(
        &self,
        root: &Value,
        instance_path: &JsonPointer,
        schema_path: &JsonPointer,
    ) -> Vec<Violation> {
        let summary = || Violation {
            instance_path: instance_path.clone(),
            schema_path: schema_path.clone(),
            keyword: "oneOf".to_string(),
            message: "must match exactly one schema in oneOf".to_string(),
        };

        let (Some(node), Some(branches)) = (
            root.pointer(&instance_path.to_string()),
            self.schema
                .location_of(schema_path)
                .and_then(|location| self.branches.get(&location)),
        ) else {
            return vec![summary()];
        };

        let mut applicable = Vec::new();
        let mut mismatched = Vec::new();
        for (index, validator) in branches.iter().enumerate() {
            let branch_path = schema_path.child(index.to_string());
            let mut found = Vec::new();
            for error in validator.iter_errors(node) {
                self.convert(root, &error, instance_path, &branch_path, &mut found);
            }

            let wrong_shape = found
                .iter()
                .all(|v| v.keyword == "type" && &v.instance_path == instance_path);
            if wrong_shape {
                mismatched.extend(found);
            } else {
                applicable.extend(found);
            }
        }

        let chosen = if applicable.is_empty() {
            mismatched
        } else {
            applicable
        };
        if chosen.is_empty() {
            vec![summary()]
        } else {
            chosen
        }
    }

    fn reason(&self, error: &ValidationError<'_>, keyword: &str, schema_path: &JsonPointer) -> String {
        let keyword_value = || self.schema.node_at(schema_path);
        match keyword {
            "required" => match &error.kind {
                ValidationErrorKind::Required { property } => format!(
                    "must have required property '{}'",
                    property.as_str().map_or_else(|| property.to_string(), str::to_string)
                ),
                _ => error.to_string(),
            },
            "type" => match keyword_value() {
                Some(Value::String(expected)) => format!("must be {expected}"),
                Some(Value::Array(expected)) => {
                    let names: Vec<&str> = expected.iter().filter_map(Value::as_str).collect();
                    format!("must be {}", names.join(","))
                }
                _ => error.to_string(),
            },
            "minimum" => match keyword_value() {
                Some(limit) => format!("must be >= {limit}"),
                None => error.to_string(),
            },
            "enum" => "must be equal to one of the allowed values".to_string(),
            "const" => "must be equal to constant".to_string(),
            "uniqueItems" => "must NOT have duplicate items".to_string(),
            "additionalProperties" => "must NOT have additional properties".to_string(),
            "oneOf" => "must match exactly one schema in oneOf".to_string(),
            _ => error.to_string(),
        }
    }
}

/// Validate the manifest at `path` with the shared validator.
///
/// `None` means the manifest could not be located. On success the parsed
/// manifest is returned unchanged and nothing is written to `sink`.
pub fn validate_manifest(
    path: Option<&Path>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Value, ErrorCode> {
    match ManifestValidator::shared() {
        Ok(validator) => validator.validate_file(path, sink),
        Err(e) => {
            tracing::error!(error = %e, "app manifest schema is unusable");
            sink.error(format!("error: {e}"));
            Err(ErrorCode::Schema)
        }
    }
}
