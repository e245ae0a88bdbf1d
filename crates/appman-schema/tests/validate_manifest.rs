//! Integration tests: validate manifest files on disk end to end.
//!
//! Each test writes a manifest into a temporary directory, runs it through
//! `validate_manifest`, and checks the returned value or code together
//! with the exact diagnostic lines.

use std::path::{Path, PathBuf};

use appman_core::{find_file, ErrorCode, NoDescriptions, Platform, PlatformDefaults};
use appman_schema::{validate_manifest, CollectingSink, ManifestValidator};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("app.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn run(content: &str) -> (Result<Value, ErrorCode>, Vec<String>, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(&dir, content);
    let mut sink = CollectingSink::new();
    let result = validate_manifest(Some(path.as_path()), &mut sink);
    (result, sink.into_lines(), path)
}

fn run_json(manifest: &Value) -> (Result<Value, ErrorCode>, Vec<String>, PathBuf) {
    run(&manifest.to_string())
}

fn line(path: &Path, rest: &str) -> String {
    format!("{}: error: {rest}", path.display())
}

fn header(path: &Path) -> String {
    line(path, &format!("{} is not a valid app manifest", path.display()))
}

#[test]
fn valid_manifest_is_returned_unchanged() {
    let manifest = json!({
        "name": "Example",
        "displayName": "Example",
        "components": [{"appKey": "Example", "displayName": "App"}]
    });
    let (result, lines, _) = run_json(&manifest);
    assert_eq!(result.unwrap(), manifest);
    assert!(lines.is_empty(), "unexpected diagnostics: {lines:?}");
}

#[test]
fn fully_populated_manifest_is_valid() {
    let manifest = json!({
        "name": "Example",
        "displayName": "Example",
        "bundleRoot": "dist",
        "singleApp": "main",
        "version": "1.0.0",
        "components": [
            {"appKey": "Example", "displayName": "App", "slug": "main"},
            {
                "appKey": "Settings",
                "initialProperties": {"theme": "dark"},
                "presentationStyle": "modal"
            }
        ],
        "resources": {
            "android": ["dist/res", "dist/main.android.jsbundle"],
            "ios": ["dist/assets", "dist/main.ios.jsbundle"],
            "macos": ["dist/assets"],
            "windows": ["dist/main.windows.bundle"]
        },
        "android": {
            "package": "com.example.app",
            "versionCode": 12,
            "versionName": "1.0",
            "icons": "res",
            "signingConfigs": {
                "debug": {"storeFile": "debug.keystore"},
                "release": {
                    "storeFile": "release.keystore",
                    "keyAlias": "release",
                    "keyPassword": "secret",
                    "storePassword": "secret"
                }
            },
            "features": [{"android:name": "android.hardware.camera"}],
            "permissions": [{"android:name": "android.permission.CAMERA"}]
        },
        "ios": {
            "bundleIdentifier": "com.example.app",
            "buildNumber": "12",
            "icons": {
                "primaryIcon": {"filename": "Icon.png", "prerendered": true},
                "alternateIcons": {"Dark": {"filename": "Dark.png", "prerendered": false}}
            },
            "codeSignEntitlements": "Example.entitlements",
            "codeSignIdentity": "Apple Development",
            "developmentTeam": "ABCDE12345",
            "privacyManifest": {"NSPrivacyTracking": false},
            "reactNativePath": "node_modules/react-native"
        },
        "macos": {"codeSignEntitlements": {"com.apple.security.app-sandbox": true}},
        "visionos": {"bundleIdentifier": "com.example.app.vision"},
        "windows": {
            "appxManifest": "windows/Package.appxmanifest",
            "certificateKeyFile": "windows/key.pfx",
            "certificatePassword": "secret",
            "certificateThumbprint": "ABCDEF"
        }
    });
    let (result, lines, _) = run_json(&manifest);
    assert_eq!(result.unwrap(), manifest);
    assert!(lines.is_empty(), "unexpected diagnostics: {lines:?}");
}

#[test]
fn missing_manifest_path_is_not_found() {
    let mut sink = CollectingSink::new();
    let code = validate_manifest(None, &mut sink).unwrap_err();
    assert_eq!(code, ErrorCode::NotFound);
    assert_eq!(code.code(), 1);
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].contains("could not locate the manifest file"));
}

#[test]
fn unreadable_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("app.json");
    let mut sink = CollectingSink::new();
    assert_eq!(
        validate_manifest(Some(path.as_path()), &mut sink).unwrap_err(),
        ErrorCode::NotFound
    );
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].starts_with(&format!("{}: error: ", path.display())));
}

#[test]
fn invalid_json_is_a_schema_failure() {
    let (result, lines, path) = run("{\"name\": \"Example\",");
    assert_eq!(result.unwrap_err(), ErrorCode::Schema);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("{}: error: ", path.display())));
    assert!(lines[0].contains("line 1"), "{}", lines[0]);
}

#[test]
fn invalid_utf8_is_a_schema_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.json");
    std::fs::write(&path, b"{\"name\":\"E\xff\",\"displayName\":\"E\"}").unwrap();

    let mut sink = CollectingSink::new();
    let code = validate_manifest(Some(path.as_path()), &mut sink).unwrap_err();
    assert_eq!(code, ErrorCode::Schema);
    assert_eq!(code.code(), 1001);
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].starts_with(&format!("{}: error: ", path.display())));
}

#[test]
fn missing_display_name() {
    let (result, lines, path) = run_json(&json!({"name": "Example"}));
    assert_eq!(result.unwrap_err().code(), 1001);
    assert_eq!(
        lines,
        [
            header(&path),
            line(&path, "<root> must have required property 'displayName'"),
        ]
    );
}

#[test]
fn component_without_app_key() {
    let (result, lines, path) = run_json(&json!({
        "name": "Example",
        "displayName": "Example",
        "components": [{"appKey": "First"}, {"displayName": "Second"}]
    }));
    assert_eq!(result.unwrap_err(), ErrorCode::Schema);
    assert_eq!(
        lines,
        [
            header(&path),
            line(&path, "/components/1 must have required property 'appKey'"),
        ]
    );
}

#[test]
fn component_with_unknown_presentation_style() {
    let (result, lines, path) = run_json(&json!({
        "name": "Example",
        "displayName": "Example",
        "components": [{"appKey": "Example", "presentationStyle": "fullscreen"}]
    }));
    assert_eq!(result.unwrap_err(), ErrorCode::Schema);
    assert_eq!(
        lines,
        [
            header(&path),
            line(
                &path,
                "/components/0/presentationStyle must be equal to one of the allowed values"
            ),
        ]
    );
}

#[test]
fn resources_of_wrong_type() {
    let (result, lines, path) = run_json(&json!({
        "name": "Example",
        "displayName": "Example",
        "resources": 42
    }));
    assert_eq!(result.unwrap_err().code(), 1003);
    assert_eq!(
        lines,
        [
            header(&path),
            line(&path, "/resources must be array"),
            line(&path, "/resources must be object"),
        ]
    );
}

#[test]
fn duplicate_shared_resources() {
    let (result, lines, path) = run(
        r#"{"name":"Example","displayName":"Example","resources":["app.json","app.json"]}"#,
    );
    assert_eq!(result.unwrap_err(), ErrorCode::Resources);
    assert_eq!(
        lines,
        [
            header(&path),
            line(&path, "/resources must NOT have duplicate items"),
        ]
    );
}

#[test]
fn duplicate_platform_resources() {
    for platform in Platform::WITH_RESOURCES {
        let mut resources = serde_json::Map::new();
        resources.insert("android".to_string(), json!(["dist/res"]));
        resources.insert(platform.to_string(), json!(["dist/assets", "dist/assets"]));
        let (result, lines, path) = run_json(&json!({
            "name": "Example",
            "displayName": "Example",
            "resources": resources
        }));
        assert_eq!(result.unwrap_err(), ErrorCode::Resources, "{platform}");
        assert_eq!(
            lines,
            [
                header(&path),
                line(
                    &path,
                    &format!("/resources/{platform} must NOT have duplicate items")
                ),
            ]
        );
    }
}

#[test]
fn resources_errors_dominate_other_errors() {
    let (result, lines, path) = run_json(&json!({
        "name": "Example",
        "resources": ["a", "a"]
    }));
    assert_eq!(result.unwrap_err(), ErrorCode::Resources);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], header(&path));
    assert!(lines.contains(&line(&path, "<root> must have required property 'displayName'")));
    assert!(lines.contains(&line(&path, "/resources must NOT have duplicate items")));
}

#[test]
fn type_errors_outside_resources_are_schema_failures() {
    let (result, lines, path) = run_json(&json!({
        "displayName": "Example",
        "name": "Example",
        "windows": {"appxManifest": 7}
    }));
    assert_eq!(result.unwrap_err(), ErrorCode::Schema);
    assert_eq!(
        lines,
        [header(&path), line(&path, "/windows/appxManifest must be string")]
    );
}

#[test]
fn typed_validation_converts_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_manifest(
        &dir,
        r#"{"name":"Example","displayName":"Example","components":[{"appKey":"Example"}]}"#,
    );
    let validator = ManifestValidator::new(&NoDescriptions, &PlatformDefaults::default()).unwrap();
    let mut sink = CollectingSink::new();
    let manifest = validator.validate_typed(Some(path.as_path()), &mut sink).unwrap();
    assert_eq!(manifest.components[0].app_key, "Example");
    assert!(sink.lines().is_empty());
}

#[test]
fn locate_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = json!({"name": "Example", "displayName": "Example"});
    std::fs::write(dir.path().join("app.json"), manifest.to_string()).unwrap();
    let nested = dir.path().join("src").join("screens");
    std::fs::create_dir_all(&nested).unwrap();

    let found = find_file("app.json", Some(nested.as_path()));
    let mut sink = CollectingSink::new();
    assert_eq!(validate_manifest(found.as_deref(), &mut sink).unwrap(), manifest);
    assert!(sink.lines().is_empty());
}
