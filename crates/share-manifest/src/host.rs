//! Host build-tool plugin contract
//!
//! The host drives each build as a single forward pass and calls these hooks
//! sequentially: `build_start` when a build begins, `generate_bundle` once
//! its outputs are finalized, and the `resolve_id`/`load`/`transform` triple
//! while linking the consumer side's module graph. Plugins implement exactly
//! the hooks they need; every hook has a no-op default.

use std::path::Path;

use share_manifest_core::{OutputBundle, OutputOptions};

/// Capabilities the host exposes to a plugin while a hook runs.
pub trait PluginContext {
    /// Declares `path` as a file dependency of the module being processed,
    /// wiring it into the host's watch graph.
    fn add_watch_file(&mut self, path: &Path);
}

/// A duck-typed build plugin: the host calls whichever hooks the plugin
/// implements.
pub trait BuildPlugin {
    fn name(&self) -> &str;

    /// Called when a build pass starts.
    fn build_start(&self) {}

    /// Called once per build with the finalized output set.
    fn generate_bundle(&self, _options: &OutputOptions, _bundle: &OutputBundle) {}

    /// Maps an import specifier to a resolved module id, or `None` to let
    /// other resolvers handle it.
    fn resolve_id(&self, _id: &str) -> Option<String> {
        None
    }

    /// Produces module source for a resolved id, or `None` when the id is
    /// not this plugin's to load.
    fn load(&self, _id: &str) -> Option<String> {
        None
    }

    /// Post-load hook; used here to register watch-file dependencies.
    fn transform(&self, _ctx: &mut dyn PluginContext, _code: &str, _id: &str) {}
}
