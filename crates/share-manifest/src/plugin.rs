//! The shared-manifest factory and its producer/consumer plugins
//!
//! [`SharedManifest::new`] constructs one isolated registry plus one change
//! sentinel. [`SharedManifest::record`] registers a producer slot at call
//! time (duplicate alias keys fail right there, before any build work) and
//! returns the plugin that snapshots that build's outputs.
//! [`SharedManifest::provide`] returns the consumer plugin serving the
//! `virtual:shared-manifest(s)` identifier family. The accessor methods
//! expose the same clone-on-read snapshots programmatically.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use share_manifest_core::{
    build_manifest, BuildOptions, Manifest, ManifestAssets, ManifestChunks, ManifestField,
    ManifestRegistry, OutputBundle, OutputOptions, RecordKey, ShareManifestError,
};

use crate::host::{BuildPlugin, PluginContext};
use crate::notify::ChangeNotifier;
use crate::virtual_id::{extract_query, is_resolved_modules_id, resolve_virtual_id};

/// Options for [`SharedManifest::record`].
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Alias key for the recorded manifest; coerced to its canonical string
    /// form at registration. Defaults to the auto-assigned internal key.
    pub key: Option<RecordKey>,
    /// Suppress embedding chunk source in the snapshot.
    pub without_code: bool,
}

/// Options for [`SharedManifest::provide`]. Currently empty; kept as an
/// extension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvideOptions {}

/// Factory owning one manifest registry and one change sentinel. Multiple
/// factories coexist with fully isolated state.
pub struct SharedManifest {
    registry: Arc<RwLock<ManifestRegistry>>,
    notifier: Arc<ChangeNotifier>,
}

impl SharedManifest {
    pub fn new() -> Result<Self, ShareManifestError> {
        Ok(SharedManifest {
            registry: Arc::new(RwLock::new(ManifestRegistry::new())),
            notifier: Arc::new(ChangeNotifier::new()?),
        })
    }

    /// Creates the producer plugin for one build, registering its manifest
    /// slot immediately. A duplicate alias key is a configuration error and
    /// fails here, never at build time.
    pub fn record(&self, options: RecordOptions) -> Result<RecordPlugin, ShareManifestError> {
        let internal_key = self.registry.write().register(options.key.as_ref())?;
        debug!(key = %internal_key, "registered producer manifest slot");

        Ok(RecordPlugin {
            registry: Arc::clone(&self.registry),
            notifier: Arc::clone(&self.notifier),
            internal_key,
            build_options: BuildOptions {
                without_code: options.without_code,
            },
        })
    }

    /// Creates the consumer plugin serving the virtual identifier family.
    pub fn provide(&self, _options: ProvideOptions) -> ProvidePlugin {
        ProvidePlugin {
            registry: Arc::clone(&self.registry),
            notifier: Arc::clone(&self.notifier),
        }
    }

    /// All recorded manifests, addressed by alias key where one exists.
    /// Deep copies: mutating the result never affects live state.
    pub fn get_manifests(&self) -> IndexMap<String, Manifest> {
        self.registry.read().get_all()
    }

    /// One manifest by key, or `None` when the key is unknown.
    pub fn get_manifest(&self, key: impl Into<RecordKey>) -> Option<Manifest> {
        self.registry.read().get(&key.into())
    }

    /// The first/only manifest (internal key `0`).
    pub fn get_first_manifest(&self) -> Option<Manifest> {
        self.get_manifest("0")
    }

    /// The chunks map of one manifest.
    pub fn get_chunks(&self, key: impl Into<RecordKey>) -> Option<ManifestChunks> {
        self.registry.read().get_chunks(&key.into())
    }

    /// The assets map of one manifest.
    pub fn get_assets(&self, key: impl Into<RecordKey>) -> Option<ManifestAssets> {
        self.registry.read().get_assets(&key.into())
    }

    /// Path of the change sentinel, for tests and external watch wiring.
    pub fn sentinel_path(&self) -> &Path {
        self.notifier.path()
    }
}

/// Producer plugin: populates one registry slot from a build's finalized
/// output set. Use in the build where the code-splitting takes place.
pub struct RecordPlugin {
    registry: Arc<RwLock<ManifestRegistry>>,
    notifier: Arc<ChangeNotifier>,
    internal_key: String,
    build_options: BuildOptions,
}

impl RecordPlugin {
    /// The internal key this producer records under.
    pub fn key(&self) -> &str {
        &self.internal_key
    }
}

impl BuildPlugin for RecordPlugin {
    fn name(&self) -> &str {
        "share-manifest:record"
    }

    fn build_start(&self) {
        // Incremental rebuilds reuse the slot; stale chunks must not survive
        // into the next snapshot.
        self.registry.write().clear(&self.internal_key);
    }

    fn generate_bundle(&self, options: &OutputOptions, bundle: &OutputBundle) {
        let manifest = build_manifest(bundle, options, &self.build_options);
        self.registry.write().commit(&self.internal_key, manifest);
        self.notifier.touch();
    }
}

/// Consumer plugin: resolves and loads the `virtual:shared-manifest(s)`
/// identifier family against the registry's current state.
pub struct ProvidePlugin {
    registry: Arc<RwLock<ManifestRegistry>>,
    notifier: Arc<ChangeNotifier>,
}

impl BuildPlugin for ProvidePlugin {
    fn name(&self) -> &str {
        "share-manifest:provide"
    }

    fn resolve_id(&self, id: &str) -> Option<String> {
        resolve_virtual_id(id)
    }

    fn load(&self, id: &str) -> Option<String> {
        if !is_resolved_modules_id(id) {
            return None;
        }
        let query = extract_query(id)?;

        let registry = self.registry.read();
        let source = match query.key {
            None => render_module(&registry.get_all()),
            Some(key) => {
                let record_key = RecordKey::from(key.as_str());
                match query.field {
                    None => render_nullable(registry.get(&record_key).as_ref()),
                    Some(ManifestField::Chunks) => {
                        render_nullable(registry.get_chunks(&record_key).as_ref())
                    }
                    Some(ManifestField::Assets) => {
                        render_nullable(registry.get_assets(&record_key).as_ref())
                    }
                }
            }
        };
        Some(source)
    }

    fn transform(&self, ctx: &mut dyn PluginContext, _code: &str, id: &str) {
        if is_resolved_modules_id(id) {
            // Re-run the consumer build whenever a producer rebuilds.
            ctx.add_watch_file(self.notifier.path());
        }
    }
}

/// Serializes a snapshot as loadable module source: a single default export
/// of the literal value. Snapshots are plain data, so serialization cannot
/// fail in practice; the fallback keeps the hook total.
fn render_module<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    format!("export default {json};")
}

fn render_nullable<T: Serialize>(value: Option<&T>) -> String {
    match value {
        Some(inner) => render_module(inner),
        None => "export default null;".to_string(),
    }
}
