//! # Schema Document
//!
//! The schema is a registry of named sub-schemas under `$defs` plus a
//! root that refers to them with `"$ref": "#/$defs/<name>"`. `apple`, for
//! one, is referenced from three platform blocks; it is stored once and
//! every reference resolves to that single node.

use serde_json::{Map, Value};

use crate::violation::JsonPointer;

/// Keyword holding the named sub-schemas.
pub const DEFS_KEYWORD: &str = "$defs";

/// Prefix of references into [`DEFS_KEYWORD`].
pub const DEFS_REF_PREFIX: &str = "#/$defs/";

/// Annotation read by external code generators; inert during validation.
pub const EXCLUDE_FROM_CODEGEN: &str = "exclude-from-codegen";

/// An immutable schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Value,
}

impl SchemaDocument {
    /// Wrap a schema value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The schema as JSON.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Consume the document, returning the schema JSON.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// The reference string that points at definition `name`.
    pub fn ref_to(name: &str) -> String {
        format!("{DEFS_REF_PREFIX}{name}")
    }

    /// Look up a named sub-schema.
    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.root.get(DEFS_KEYWORD)?.get(name)
    }

    /// Names of all sub-schemas, sorted.
    pub fn definition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .root
            .get(DEFS_KEYWORD)
            .and_then(Value::as_object)
            .map(|defs| defs.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Resolve a local reference such as `#/$defs/apple`.
    ///
    /// Only same-document references are supported; the schema never
    /// fetches anything.
    pub fn resolve_ref(&self, reference: &str) -> Option<&Value> {
        if let Some(name) = reference.strip_prefix(DEFS_REF_PREFIX) {
            return self.definition(name);
        }
        let pointer = reference.strip_prefix('#')?;
        self.root.pointer(pointer)
    }

    /// Walk a schema path from the root, following `$ref` hops.
    ///
    /// A `$ref` segment jumps to the referenced definition. Paths that
    /// leave the hop out are accepted too: when a node has no child named
    /// by the next segment but carries a `$ref`, the walk continues in the
    /// referenced definition.
    pub fn node_at(&self, path: &JsonPointer) -> Option<&Value> {
        self.walk(path).map(|(node, _)| node)
    }

    /// Where in this document a schema path ends up.
    ///
    /// Schema paths reported during validation spell out how a node was
    /// reached (`/properties/ios/allOf/0/$ref/properties/icons`); the
    /// location names the node itself (`/$defs/apple/properties/icons`).
    /// Every path reaching the same node yields the same location.
    pub fn location_of(&self, path: &JsonPointer) -> Option<JsonPointer> {
        self.walk(path).map(|(_, location)| location)
    }

    fn walk(&self, path: &JsonPointer) -> Option<(&Value, JsonPointer)> {
        let mut node = &self.root;
        let mut location = JsonPointer::root();
        for segment in path.segments() {
            if segment != "$ref" {
                if let Some(next) = child(node, segment) {
                    node = next;
                    location = location.child(segment.as_str());
                    continue;
                }
            }
            let (target, target_location) = self.ref_target(node)?;
            if segment == "$ref" {
                node = target;
                location = target_location;
            } else {
                node = child(target, segment)?;
                location = target_location.child(segment.as_str());
            }
        }
        Some((node, location))
    }

    fn ref_target(&self, node: &Value) -> Option<(&Value, JsonPointer)> {
        let reference = node.get("$ref")?.as_str()?;
        let location = JsonPointer::parse(reference.strip_prefix('#')?);
        let target = self.root.pointer(&location.to_string())?;
        Some((target, location))
    }

    /// Locations of every object member named `keyword`, in document
    /// order.
    pub fn locations_of(&self, keyword: &str) -> Vec<JsonPointer> {
        let mut found = Vec::new();
        collect_locations(&self.root, keyword, &JsonPointer::root(), &mut found);
        found
    }

    /// Every `$ref` in the document that does not resolve.
    ///
    /// Empty for any document produced by [`build_schema`](crate::build_schema).
    pub fn unresolved_refs(&self) -> Vec<String> {
        let mut refs = Vec::new();
        collect_refs(&self.root, &mut refs);
        refs.into_iter()
            .filter(|r| self.resolve_ref(r).is_none())
            .collect()
    }

    /// A copy of `node` that compiles on its own: the document's `$defs`
    /// are attached so that references inside it still resolve.
    pub fn standalone(&self, node: &Value) -> Value {
        match (node, self.root.get(DEFS_KEYWORD)) {
            (Value::Object(map), Some(defs)) => {
                let mut map: Map<String, Value> = map.clone();
                map.insert(DEFS_KEYWORD.to_string(), defs.clone());
                Value::Object(map)
            }
            _ => node.clone(),
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    ///
    /// Object keys are emitted in sorted order, so equal documents always
    /// serialize to identical bytes.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn collect_locations(node: &Value, keyword: &str, at: &JsonPointer, out: &mut Vec<JsonPointer>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                let location = at.child(key.as_str());
                if key == keyword {
                    out.push(location.clone());
                }
                collect_locations(value, keyword, &location, out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_locations(item, keyword, &at.child(index.to_string()), out);
            }
        }
        _ => {}
    }
}

fn collect_refs(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("$ref", Value::String(r)) => out.push(r.clone()),
                    _ => collect_refs(value, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        _ => {}
    }
}
