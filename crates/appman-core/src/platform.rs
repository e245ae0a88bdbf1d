//! # Platforms
//!
//! The platforms an app manifest can configure, and the default React
//! Native package each Apple platform resolves when no explicit
//! `reactNativePath` is set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A target platform named in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android.
    Android,
    /// iOS.
    Ios,
    /// macOS.
    Macos,
    /// visionOS.
    Visionos,
    /// Windows.
    Windows,
}

impl Platform {
    /// All platforms, in manifest order.
    pub const ALL: [Platform; 5] = [
        Platform::Android,
        Platform::Ios,
        Platform::Macos,
        Platform::Visionos,
        Platform::Windows,
    ];

    /// Platforms that share the Apple settings block.
    pub const APPLE: [Platform; 3] = [Platform::Ios, Platform::Macos, Platform::Visionos];

    /// Platforms that may carry their own resource list.
    pub const WITH_RESOURCES: [Platform; 4] = [
        Platform::Android,
        Platform::Ios,
        Platform::Macos,
        Platform::Windows,
    ];

    /// The manifest key for this platform.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Visionos => "visionos",
            Self::Windows => "windows",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Macos => "macOS",
            Self::Visionos => "visionOS",
            Self::Windows => "Windows",
        }
    }

    /// Returns true for iOS, macOS and visionOS.
    pub fn is_apple(self) -> bool {
        Self::APPLE.contains(&self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown platform: {s}"))
    }
}

/// Default React Native package per Apple platform.
///
/// Substituted into the generated description of each platform's
/// `reactNativePath` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformDefaults {
    packages: BTreeMap<Platform, String>,
}

impl PlatformDefaults {
    /// An empty map; every lookup falls back to `react-native`.
    pub fn empty() -> Self {
        Self {
            packages: BTreeMap::new(),
        }
    }

    /// Set the default package for a platform.
    pub fn with(mut self, platform: Platform, package: impl Into<String>) -> Self {
        self.packages.insert(platform, package.into());
        self
    }

    /// Override entries with those of `other`.
    pub fn merge(&mut self, other: &PlatformDefaults) {
        for (platform, package) in &other.packages {
            self.packages.insert(*platform, package.clone());
        }
    }

    /// The default package for `platform`.
    pub fn package_for(&self, platform: Platform) -> &str {
        self.packages
            .get(&platform)
            .map(String::as_str)
            .unwrap_or("react-native")
    }
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self::empty()
            .with(Platform::Ios, "react-native")
            .with(Platform::Macos, "react-native-macos")
            .with(Platform::Visionos, "@callstack/react-native-visionos")
    }
}
