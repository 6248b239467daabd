//! Manifest building
//!
//! Turns one completed build's output set into a [`Manifest`] snapshot. The
//! assets pass runs to completion before any chunk import is classified:
//! local classification has to know which outputs are assets so an import
//! resolving to an asset is omitted rather than mis-tagged local.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use crate::bundle::{BundleOutput, OutputAsset, OutputBundle, OutputChunk, OutputOptions};
use crate::classify::classify;
use crate::types::{ImportRecord, Manifest, ManifestAsset, ManifestChunk};

/// Producer-side recording options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Suppress embedding chunk source in the snapshot.
    pub without_code: bool,
}

/// Builds one [`Manifest`] from a completed build's output set.
///
/// Invoked once per build at bundle-generation time. Chunk import lists are
/// classified in declaration order, so snapshots are deterministic for a
/// fixed output set.
pub fn build_manifest(
    bundle: &OutputBundle,
    output_options: &OutputOptions,
    build_options: &BuildOptions,
) -> Manifest {
    let mut manifest = Manifest::default();

    for output in bundle.values() {
        if let BundleOutput::Asset(asset) = output {
            let entry = manifest_asset(asset);
            manifest.assets.insert(entry.file_name.clone(), entry);
        }
    }

    for output in bundle.values() {
        if let BundleOutput::Chunk(chunk) = output {
            let entry = manifest_chunk(chunk, bundle, output_options, build_options);
            manifest.chunks.insert(entry.file_name.clone(), entry);
        }
    }

    debug!(
        chunks = manifest.chunks.len(),
        assets = manifest.assets.len(),
        "built manifest snapshot"
    );

    manifest
}

fn manifest_asset(asset: &OutputAsset) -> ManifestAsset {
    let name = asset.logical_name().unwrap_or(&asset.file_name);
    ManifestAsset {
        name: Arc::from(name),
        file_name: Arc::from(asset.file_name.as_str()),
    }
}

fn classify_all(
    specifiers: &[String],
    bundle: &OutputBundle,
    output_options: &OutputOptions,
) -> Vec<ImportRecord> {
    specifiers
        .iter()
        .filter_map(|specifier| classify(specifier, bundle, &output_options.globals))
        .collect()
}

fn manifest_chunk(
    chunk: &OutputChunk,
    bundle: &OutputBundle,
    output_options: &OutputOptions,
    build_options: &BuildOptions,
) -> ManifestChunk {
    let imports = classify_all(&chunk.imports, bundle, output_options);
    let dynamic_imports = classify_all(&chunk.dynamic_imports, bundle, output_options);

    let code: Arc<str> = if build_options.without_code {
        Arc::from("")
    } else {
        Arc::from(chunk.code.as_str())
    };

    ManifestChunk {
        name: Arc::from(chunk.name.as_str()),
        file_name: Arc::from(chunk.file_name.as_str()),
        is_entry: chunk.is_entry,
        is_dynamic_entry: chunk.is_dynamic_entry,
        format: output_options.format.unwrap_or_default(),
        imports,
        dynamic_imports,
        exports: chunk
            .exports
            .iter()
            .map(|name| Arc::from(name.as_str()))
            .collect::<SmallVec<[Arc<str>; 4]>>(),
        code,
    }
}
