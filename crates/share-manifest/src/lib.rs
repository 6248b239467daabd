//! Share-Manifest
//!
//! Lets independently-bundled builds share knowledge of each other's output
//! shape. A producer build records, for every emitted chunk and asset, its
//! public identity and typed dependency edges; a later consumer build reads
//! that snapshot back through a `virtual:shared-manifest(s)` module id,
//! without needing the producer's source tree.
//!
//! ```no_run
//! use share_manifest::{RecordOptions, SharedManifest};
//!
//! # fn main() -> Result<(), share_manifest_core::ShareManifestError> {
//! let shared = SharedManifest::new()?;
//!
//! // Producer side: hand this plugin to the build that does the
//! // code-splitting.
//! let record = shared.record(RecordOptions::default())?;
//!
//! // Consumer side: hand this plugin to the build that imports
//! // "virtual:shared-manifest".
//! let provide = shared.provide(Default::default());
//!
//! // Direct programmatic access.
//! let manifest = shared.get_first_manifest();
//! # let _ = (record, provide, manifest);
//! # Ok(())
//! # }
//! ```

pub mod host;
pub mod notify;
pub mod plugin;
pub mod virtual_id;

pub use host::{BuildPlugin, PluginContext};
pub use notify::ChangeNotifier;
pub use plugin::{ProvideOptions, ProvidePlugin, RecordOptions, RecordPlugin, SharedManifest};
pub use virtual_id::{ManifestQuery, RESOLVED_ID_PREFIX, VIRTUAL_MODULES_ID, VIRTUAL_MODULE_ID};

// Re-export the data model so downstream builds depend on one crate only.
pub use share_manifest_core::{
    build_manifest, BuildOptions, BundleOutput, Globals, ImportRecord, Manifest, ManifestAsset,
    ManifestAssets, ManifestChunk, ManifestChunks, ManifestField, ManifestRegistry, ModuleFormat,
    OutputAsset, OutputBundle, OutputChunk, OutputOptions, RecordKey, ShareManifestError,
};
