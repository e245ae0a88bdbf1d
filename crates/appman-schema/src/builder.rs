//! # Schema Builder
//!
//! Assembles the app manifest schema from code. The output is a pure
//! function of the documentation and the platform defaults: no state, no
//! I/O, and identical bytes for identical inputs.
//!
//! ## Layout
//!
//! ```text
//! $defs
//!   appIconSet     icon file            (exclude-from-codegen)
//!   apple          iOS/macOS/visionOS   (exclude-from-codegen)
//!   component      launchable unit
//!   manifest       shared top-level fields
//!   signingConfig  Android keystore     (exclude-from-codegen)
//! allOf: [ $ref manifest ]
//! properties: resources, android, ios, macos, visionos, windows
//! ```
//!
//! Each Apple platform block is `allOf` the shared `apple` definition and
//! a one-field extension holding that platform's `reactNativePath`.

use serde_json::{json, Map, Value};

use appman_core::{brief, DescriptionProvider, Platform, PlatformDefaults};

use crate::document::{SchemaDocument, DEFS_KEYWORD, EXCLUDE_FROM_CODEGEN};

/// Dialect declared by the generated schema.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Build the app manifest schema.
pub fn build_schema(
    descriptions: &dyn DescriptionProvider,
    platform_defaults: &PlatformDefaults,
) -> SchemaDocument {
    let builder = Builder {
        docs: descriptions,
        defaults: platform_defaults,
    };

    let mut defs = Map::new();
    defs.insert("appIconSet".into(), builder.app_icon_set());
    defs.insert("apple".into(), builder.apple());
    defs.insert("component".into(), builder.component());
    defs.insert("manifest".into(), builder.manifest());
    defs.insert("signingConfig".into(), builder.signing_config());

    let mut properties = Map::new();
    properties.insert("resources".into(), builder.resources());
    properties.insert("android".into(), builder.android());
    for platform in Platform::APPLE {
        properties.insert(platform.as_str().into(), builder.apple_platform(platform));
    }
    properties.insert("windows".into(), builder.windows());

    let mut root = Map::new();
    root.insert("$schema".into(), json!(SCHEMA_DIALECT));
    root.insert(DEFS_KEYWORD.into(), Value::Object(defs));
    root.insert("allOf".into(), json!([reference("manifest")]));
    root.insert("properties".into(), Value::Object(properties));

    SchemaDocument::from_value(Value::Object(root))
}

fn reference(name: &str) -> Value {
    json!({ "$ref": SchemaDocument::ref_to(name) })
}

fn exclude_from_codegen(mut node: Value) -> Value {
    if let Value::Object(map) = &mut node {
        map.insert(EXCLUDE_FROM_CODEGEN.into(), Value::Bool(true));
    }
    node
}

fn string() -> Value {
    json!({ "type": "string" })
}

fn object() -> Value {
    json!({ "type": "object" })
}

fn unique_paths() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "uniqueItems": true
    })
}

struct Builder<'a> {
    docs: &'a dyn DescriptionProvider,
    defaults: &'a PlatformDefaults,
}

impl Builder<'_> {
    /// Attach documentation for `key` to `node`, or `fallback` when the
    /// key is undocumented.
    fn describe(&self, key: &str, fallback: &str, node: Value) -> Value {
        let mut map = match node {
            Value::Object(map) => map,
            other => return other,
        };
        match self.docs.get(key) {
            Some(text) => {
                map.insert("description".into(), json!(brief(text)));
                map.insert("markdownDescription".into(), json!(text));
            }
            None => {
                map.insert("description".into(), json!(fallback));
            }
        }
        Value::Object(map)
    }

    fn app_icon_set(&self) -> Value {
        exclude_from_codegen(json!({
            "type": "object",
            "properties": {
                "filename": {
                    "description": "Path to the app icon file.",
                    "type": "string"
                },
                "prerendered": {
                    "description": "Whether the icon already has visual effects applied.",
                    "type": "boolean"
                }
            },
            "required": ["filename", "prerendered"]
        }))
    }

    fn apple(&self) -> Value {
        let icons = json!({
            "type": "object",
            "properties": {
                "primaryIcon": self.describe(
                    "ios.icons.primaryIcon",
                    "The icon shown on the home screen.",
                    reference("appIconSet"),
                ),
                "alternateIcons": self.describe(
                    "ios.icons.alternateIcons",
                    "Icons the app can switch to at runtime, keyed by name.",
                    json!({
                        "type": "object",
                        "additionalProperties": reference("appIconSet")
                    }),
                )
            },
            "required": ["primaryIcon"]
        });

        exclude_from_codegen(json!({
            "type": "object",
            "properties": {
                "bundleIdentifier": self.describe(
                    "ios.bundleIdentifier",
                    "Bundle identifier of the app.",
                    string(),
                ),
                "buildNumber": self.describe(
                    "ios.buildNumber",
                    "Build number of the app.",
                    string(),
                ),
                "icons": self.describe("ios.icons", "App icons.", icons),
                "codeSignEntitlements": self.describe(
                    "ios.codeSignEntitlements",
                    "Path to an entitlements file, or the entitlements themselves.",
                    json!({ "oneOf": [string(), object()] }),
                ),
                "codeSignIdentity": self.describe(
                    "ios.codeSignIdentity",
                    "Code signing identity.",
                    string(),
                ),
                "developmentTeam": self.describe(
                    "ios.developmentTeam",
                    "Development team id used for signing.",
                    string(),
                ),
                "privacyManifest": self.describe(
                    "ios.privacyManifest",
                    "Contents of the privacy manifest.",
                    object(),
                )
            }
        }))
    }

    fn apple_platform(&self, platform: Platform) -> Value {
        let package = self.defaults.package_for(platform);
        let react_native_path = json!({
            "description": format!(
                "A custom path to React Native for {}. Useful when `require(\"{}\")` \
                 does not resolve to the copy the app should build against.",
                platform.display_name(),
                package,
            ),
            "type": "string"
        });

        self.describe(
            platform.as_str(),
            &format!("{} specific properties go here.", platform.display_name()),
            json!({
                "allOf": [
                    reference("apple"),
                    {
                        "type": "object",
                        "properties": { "reactNativePath": react_native_path }
                    }
                ]
            }),
        )
    }

    fn component(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "appKey": self.describe(
                    "components.appKey",
                    "The key the component was registered with.",
                    string(),
                ),
                "displayName": self.describe(
                    "components.displayName",
                    "Name shown in the component list.",
                    string(),
                ),
                "initialProperties": self.describe(
                    "components.initialProperties",
                    "Properties passed to the component on launch.",
                    object(),
                ),
                "presentationStyle": self.describe(
                    "components.presentationStyle",
                    "How the component is presented.",
                    json!({ "type": "string", "enum": ["default", "modal"] }),
                ),
                "slug": self.describe(
                    "components.slug",
                    "URL slug that uniquely identifies the component.",
                    string(),
                )
            },
            "required": ["appKey"]
        })
    }

    fn manifest(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": self.describe("name", "Name of the app.", string()),
                "displayName": self.describe(
                    "displayName",
                    "Name of the app shown to users.",
                    string(),
                ),
                "bundleRoot": self.describe(
                    "bundleRoot",
                    "Directory the JS bundles are loaded from.",
                    string(),
                ),
                "singleApp": self.describe(
                    "singleApp",
                    "Slug of the component to launch directly, skipping the component list.",
                    string(),
                ),
                "version": self.describe("version", "Version of the app.", string()),
                "components": self.describe(
                    "components",
                    "Components the app can launch.",
                    json!({
                        "type": "array",
                        "items": reference("component")
                    }),
                )
            },
            "required": ["name", "displayName"]
        })
    }

    fn signing_config(&self) -> Value {
        exclude_from_codegen(json!({
            "type": "object",
            "properties": {
                "keyAlias": {
                    "description": "Alias of the private key.",
                    "type": "string"
                },
                "keyPassword": {
                    "description": "Password of the private key.",
                    "type": "string"
                },
                "storeFile": {
                    "description": "Path to the keystore file.",
                    "type": "string"
                },
                "storePassword": {
                    "description": "Password of the keystore.",
                    "type": "string"
                }
            },
            "required": ["storeFile"]
        }))
    }

    fn resources(&self) -> Value {
        let mut per_platform = Map::new();
        for platform in Platform::WITH_RESOURCES {
            per_platform.insert(platform.as_str().into(), unique_paths());
        }

        self.describe(
            "resources",
            "Files and directories to bundle, shared or per platform.",
            json!({
                "oneOf": [
                    unique_paths(),
                    {
                        "type": "object",
                        "properties": per_platform,
                        "additionalProperties": false
                    }
                ]
            }),
        )
    }

    fn android(&self) -> Value {
        let manifest_entries = || json!({ "type": "array", "items": object() });

        self.describe(
            "android",
            "Android specific properties go here.",
            json!({
                "type": "object",
                "properties": {
                    "package": self.describe(
                        "android.package",
                        "Application id of the app.",
                        string(),
                    ),
                    "versionCode": self.describe(
                        "android.versionCode",
                        "Internal version number of the app.",
                        json!({ "type": "number", "minimum": 0 }),
                    ),
                    "versionName": self.describe(
                        "android.versionName",
                        "Version number shown to users.",
                        string(),
                    ),
                    "icons": self.describe(
                        "android.icons",
                        "Path to the app icon resource.",
                        string(),
                    ),
                    "signingConfigs": self.describe(
                        "android.signingConfigs",
                        "Keystores used to sign debug and release builds.",
                        json!({
                            "type": "object",
                            "properties": {
                                "debug": self.describe(
                                    "android.signingConfigs.debug",
                                    "Signing config for debug builds.",
                                    reference("signingConfig"),
                                ),
                                "release": self.describe(
                                    "android.signingConfigs.release",
                                    "Signing config for release builds.",
                                    reference("signingConfig"),
                                )
                            }
                        }),
                    ),
                    "features": self.describe(
                        "android.features",
                        "Hardware and software features the app uses.",
                        manifest_entries(),
                    ),
                    "permissions": self.describe(
                        "android.permissions",
                        "Permissions the app requests.",
                        manifest_entries(),
                    ),
                    "metaData": self.describe(
                        "android.metaData",
                        "Name/value pairs made available to the app.",
                        manifest_entries(),
                    )
                }
            }),
        )
    }

    fn windows(&self) -> Value {
        self.describe(
            "windows",
            "Windows specific properties go here.",
            json!({
                "type": "object",
                "properties": {
                    "appxManifest": self.describe(
                        "windows.appxManifest",
                        "Path to a custom app package manifest.",
                        string(),
                    ),
                    "certificateKeyFile": self.describe(
                        "windows.certificateKeyFile",
                        "Path to the signing certificate.",
                        string(),
                    ),
                    "certificatePassword": self.describe(
                        "windows.certificatePassword",
                        "Password of the signing certificate.",
                        string(),
                    ),
                    "certificateThumbprint": self.describe(
                        "windows.certificateThumbprint",
                        "Thumbprint of the signing certificate.",
                        string(),
                    )
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use appman_core::NoDescriptions;

    fn default_schema() -> SchemaDocument {
        build_schema(&NoDescriptions, &PlatformDefaults::default())
    }

    #[test]
    fn defines_all_shared_sub_schemas() {
        assert_eq!(
            default_schema().definition_names(),
            ["appIconSet", "apple", "component", "manifest", "signingConfig"]
        );
    }

    #[test]
    fn top_level_properties_and_manifest_ref() {
        let schema = default_schema();
        let root = schema.as_value();
        let mut keys: Vec<&str> = root["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["android", "ios", "macos", "resources", "visionos", "windows"]);
        assert_eq!(root["allOf"], json!([{"$ref": "#/$defs/manifest"}]));
        assert_eq!(root["$schema"], SCHEMA_DIALECT);
    }

    #[test]
    fn every_reference_resolves() {
        assert!(default_schema().unresolved_refs().is_empty());
    }

    #[test]
    fn codegen_exclusions_are_tagged() {
        let schema = default_schema();
        for name in ["appIconSet", "apple", "signingConfig"] {
            assert_eq!(
                schema.definition(name).unwrap()[EXCLUDE_FROM_CODEGEN],
                json!(true),
                "{name} should be excluded from codegen"
            );
        }
        for name in ["component", "manifest"] {
            assert!(schema.definition(name).unwrap().get(EXCLUDE_FROM_CODEGEN).is_none());
        }
    }

    #[test]
    fn manifest_requires_name_and_display_name() {
        let schema = default_schema();
        assert_eq!(
            schema.definition("manifest").unwrap()["required"],
            json!(["name", "displayName"])
        );
        assert_eq!(schema.definition("component").unwrap()["required"], json!(["appKey"]));
        assert_eq!(
            schema.definition("appIconSet").unwrap()["required"],
            json!(["filename", "prerendered"])
        );
        assert_eq!(
            schema.definition("signingConfig").unwrap()["required"],
            json!(["storeFile"])
        );
    }

    #[test]
    fn resources_is_a_disjunction_of_unique_lists() {
        let schema = default_schema();
        let branches = schema.as_value()["properties"]["resources"]["oneOf"]
            .as_array()
            .unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0]["type"], "array");
        assert_eq!(branches[0]["uniqueItems"], true);
        assert_eq!(branches[1]["type"], "object");
        for platform in ["android", "ios", "macos", "windows"] {
            assert_eq!(branches[1]["properties"][platform]["uniqueItems"], true);
        }
        assert!(branches[1]["properties"].get("visionos").is_none());
    }

    #[test]
    fn version_code_is_non_negative() {
        let schema = default_schema();
        let version_code = &schema.as_value()["properties"]["android"]["properties"]["versionCode"];
        assert_eq!(version_code["type"], "number");
        assert_eq!(version_code["minimum"], 0);
    }

    #[test]
    fn apple_platforms_extend_shared_definition() {
        let schema = default_schema();
        for (platform, package) in [
            ("ios", "react-native"),
            ("macos", "react-native-macos"),
            ("visionos", "@callstack/react-native-visionos"),
        ] {
            let all_of = &schema.as_value()["properties"][platform]["allOf"];
            assert_eq!(all_of[0], json!({"$ref": "#/$defs/apple"}));
            let description = all_of[1]["properties"]["reactNativePath"]["description"]
                .as_str()
                .unwrap();
            assert!(
                description.contains(&format!("require(\"{package}\")")),
                "{platform}: {description}"
            );
        }
    }

    #[test]
    fn platform_defaults_change_only_descriptions() {
        let custom = build_schema(
            &NoDescriptions,
            &PlatformDefaults::default().with(Platform::Macos, "my-macos"),
        );
        let default = default_schema();
        assert_ne!(custom, default);
        assert_eq!(custom.as_value()["properties"]["ios"], default.as_value()["properties"]["ios"]);
        assert_eq!(custom.definition("apple"), default.definition("apple"));
    }

    #[test]
    fn documented_fields_get_brief_and_markdown() {
        let mut docs = HashMap::new();
        docs.insert(
            "ios.bundleIdentifier".to_string(),
            "The bundle identifier.\nUsually reverse-DNS.\n\nSee Apple docs.".to_string(),
        );
        docs.insert("windows.appxManifest".to_string(), "Custom manifest.".to_string());
        let schema = build_schema(&docs, &PlatformDefaults::default());

        let bundle_id = &schema.definition("apple").unwrap()["properties"]["bundleIdentifier"];
        assert_eq!(bundle_id["description"], "The bundle identifier. Usually reverse-DNS.");
        assert_eq!(
            bundle_id["markdownDescription"],
            "The bundle identifier.\nUsually reverse-DNS.\n\nSee Apple docs."
        );

        let appx = &schema.as_value()["properties"]["windows"]["properties"]["appxManifest"];
        assert_eq!(appx["description"], "Custom manifest.");
        assert_eq!(appx["markdownDescription"], "Custom manifest.");
    }

    #[test]
    fn undocumented_fields_get_inline_description() {
        let schema = default_schema();
        let build_number = &schema.definition("apple").unwrap()["properties"]["buildNumber"];
        assert_eq!(build_number["description"], "Build number of the app.");
        assert!(build_number.get("markdownDescription").is_none());
    }

    #[test]
    fn output_is_deterministic() {
        let mut docs = HashMap::new();
        docs.insert("name".to_string(), "Name.\n\nMore.".to_string());
        docs.insert("resources".to_string(), "Resources.".to_string());
        let first = build_schema(&docs, &PlatformDefaults::default());
        let second = build_schema(&docs, &PlatformDefaults::default());
        assert_eq!(first, second);
        assert_eq!(first.to_pretty_json().unwrap(), second.to_pretty_json().unwrap());
    }

    #[test]
    fn schema_compiles() {
        let schema = default_schema();
        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema.as_value())
            .unwrap();
    }
}
