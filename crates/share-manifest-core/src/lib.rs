//! Share-Manifest Core
//!
//! This crate holds the manifest data model and the operations that turn one
//! build's output set into a queryable snapshot: import classification,
//! manifest building, and the keyed manifest registry.
//!
//! A producer build feeds its finalized output bundle through
//! [`builder::build_manifest`] and commits the result into a
//! [`registry::ManifestRegistry`] under an auto-assigned key (optionally
//! aliased). A later consumer build reads clone-on-read snapshots back out of
//! the registry, either whole or narrowed to chunks/assets.

pub mod builder;
pub mod bundle;
pub mod classify;
pub mod errors;
pub mod registry;
pub mod types;

pub use builder::{build_manifest, BuildOptions};
pub use bundle::{BundleOutput, Globals, OutputAsset, OutputBundle, OutputChunk, OutputOptions};
pub use classify::classify;
pub use errors::ShareManifestError;
pub use registry::ManifestRegistry;
pub use types::{
    ImportRecord, Manifest, ManifestAsset, ManifestAssets, ManifestChunk, ManifestChunks,
    ManifestField, ModuleFormat, RecordKey,
};
