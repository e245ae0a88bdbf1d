//! # Typed Manifest Model
//!
//! Plain data carriers mirroring the manifest schema. They hold no logic
//! beyond conversion: validate the raw JSON first, then convert it with
//! [`Manifest::from_value`]. Unknown fields are ignored so that manifests
//! carrying tool-specific extensions still convert.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppmanError;
use crate::platform::Platform;

/// A validated app manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Name of the app.
    pub name: String,
    /// Name shown to users.
    pub display_name: String,
    /// Path to the directory holding the JS bundles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_root: Option<String>,
    /// Skip the component picker and launch the only component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_app: Option<String>,
    /// App version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Launchable components, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    /// Files and directories to bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    /// Android build settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidSettings>,
    /// iOS build settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<AppleSettings>,
    /// macOS build settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macos: Option<AppleSettings>,
    /// visionOS build settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visionos: Option<AppleSettings>,
    /// Windows build settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<WindowsSettings>,
}

impl Manifest {
    /// Convert a manifest value into the typed model.
    ///
    /// # Errors
    ///
    /// Returns [`AppmanError::Model`] if the value does not have the
    /// manifest shape.
    pub fn from_value(value: &Value) -> Result<Self, AppmanError> {
        Ok(Self::deserialize(value)?)
    }

    /// Apple settings for an Apple platform, `None` for the others.
    pub fn apple(&self, platform: Platform) -> Option<&AppleSettings> {
        match platform {
            Platform::Ios => self.ios.as_ref(),
            Platform::Macos => self.macos.as_ref(),
            Platform::Visionos => self.visionos.as_ref(),
            Platform::Android | Platform::Windows => None,
        }
    }

    /// Look up a component by its app key.
    pub fn component(&self, app_key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.app_key == app_key)
    }
}

/// One launchable unit of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Key the component is registered under.
    pub app_key: String,
    /// Name shown in the component picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Properties passed to the root component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_properties: Option<Map<String, Value>>,
    /// How the component is presented.
    #[serde(default)]
    pub presentation_style: PresentationStyle,
    /// URL slug for deep linking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Presentation of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationStyle {
    /// Pushed onto the navigation stack.
    #[default]
    Default,
    /// Presented modally.
    Modal,
}

/// Resources to bundle, shared or per platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resources {
    /// One list used by every platform.
    Shared(Vec<String>),
    /// A list per platform.
    PerPlatform(PlatformResources),
}

impl Resources {
    /// Resources bundled for `platform`.
    ///
    /// visionOS has no list of its own and uses the iOS one.
    pub fn for_platform(&self, platform: Platform) -> &[String] {
        match self {
            Self::Shared(paths) => paths.as_slice(),
            Self::PerPlatform(map) => {
                let list = match platform {
                    Platform::Android => &map.android,
                    Platform::Ios | Platform::Visionos => &map.ios,
                    Platform::Macos => &map.macos,
                    Platform::Windows => &map.windows,
                };
                list.as_deref().unwrap_or(&[])
            }
        }
    }
}

/// Per-platform resource lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformResources {
    /// Android resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<Vec<String>>,
    /// iOS resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<Vec<String>>,
    /// macOS resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macos: Option<Vec<String>>,
    /// Windows resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<Vec<String>>,
}

/// Android build settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidSettings {
    /// Application id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Internal version number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<f64>,
    /// Version shown to users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    /// Path to the icon resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<String>,
    /// Signing configurations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_configs: Option<SigningConfigs>,
    /// `<uses-feature>` entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Map<String, Value>>,
    /// `<uses-permission>` entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Map<String, Value>>,
    /// `<meta-data>` entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<Map<String, Value>>,
}

/// Android signing configurations by build type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfigs {
    /// Used for debug builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<SigningConfig>,
    /// Used for release builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<SigningConfig>,
}

/// A keystore used to sign an Android build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    /// Path to the keystore.
    pub store_file: String,
    /// Key alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    /// Key password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_password: Option<String>,
    /// Keystore password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_password: Option<String>,
}

/// Settings shared by iOS, macOS and visionOS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleSettings {
    /// Bundle identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,
    /// Build number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
    /// App icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<AppIcons>,
    /// Entitlements, as a path or inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_sign_entitlements: Option<Value>,
    /// Signing identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_sign_identity: Option<String>,
    /// Development team id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_team: Option<String>,
    /// Privacy manifest contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_manifest: Option<Map<String, Value>>,
    /// Path to a React Native fork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_native_path: Option<String>,
}

/// Primary and alternate app icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIcons {
    /// Icon used by default.
    pub primary_icon: AppIconSet,
    /// Icons the app may switch to at runtime.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alternate_icons: BTreeMap<String, AppIconSet>,
}

/// An icon file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIconSet {
    /// Path to the icon.
    pub filename: String,
    /// Whether the icon already has visual effects applied.
    pub prerendered: bool,
}

/// Windows build settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsSettings {
    /// Path to a custom `Package.appxmanifest`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appx_manifest: Option<String>,
    /// Path to the signing certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_key_file: Option<String>,
    /// Certificate password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_password: Option<String>,
    /// Certificate thumbprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_thumbprint: Option<String>,
}
