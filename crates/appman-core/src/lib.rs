//! # appman-core: Foundational Types for App Manifests
//!
//! Leaf crate of the appman workspace. It owns the pieces every other
//! crate agrees on: the stable result codes returned to scripting
//! consumers, the documentation lookup used to describe schema fields,
//! the platform list with its default React Native packages, the
//! directory-ascent search that finds a manifest on disk, and a typed
//! model of a validated manifest.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `appman-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Result codes in [`ErrorCode`] are a public contract and never renumbered.

pub mod docs;
pub mod error;
pub mod locate;
pub mod manifest;
pub mod platform;

// Re-export primary types for ergonomic imports.
pub use docs::{brief, DescriptionProvider, DocsDirectory, NoDescriptions};
pub use error::{AppmanError, ErrorCode};
pub use locate::{find_file, DEFAULT_MANIFEST_FILENAME};
pub use manifest::{
    AndroidSettings, AppIconSet, AppIcons, AppleSettings, Component, Manifest,
    PlatformResources, PresentationStyle, Resources, SigningConfig, SigningConfigs,
    WindowsSettings,
};
pub use platform::{Platform, PlatformDefaults};
