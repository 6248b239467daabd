//! Host-side bundle output model
//!
//! These are the shapes the host build tool hands to the producer plugin at
//! bundle-generation time: the per-output chunk/asset discriminant, each
//! chunk's import and export lists, and the active output options (format
//! plus globals mapping). The core consumes them read-only.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::types::ModuleFormat;

/// One emitted code output, as reported by the host build tool.
#[derive(Debug, Clone, Default)]
pub struct OutputChunk {
    pub name: String,
    pub file_name: String,
    pub is_entry: bool,
    pub is_dynamic_entry: bool,
    /// Static import specifiers in declaration order.
    pub imports: Vec<String>,
    /// Dynamic import specifiers in declaration order.
    pub dynamic_imports: Vec<String>,
    pub exports: Vec<String>,
    pub code: String,
}

/// One emitted non-code output.
#[derive(Debug, Clone, Default)]
pub struct OutputAsset {
    /// The asset's single logical name, when the host reports one.
    pub name: Option<String>,
    /// All original logical names; the first one wins.
    pub names: Vec<String>,
    pub file_name: String,
}

impl OutputAsset {
    /// The asset's original logical name: first of `names`, else `name`.
    pub fn logical_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str).or(self.name.as_deref())
    }
}

/// Per-output discriminant: every entry of the output set is either a code
/// chunk or an asset.
#[derive(Debug, Clone)]
pub enum BundleOutput {
    Chunk(OutputChunk),
    Asset(OutputAsset),
}

impl BundleOutput {
    pub fn file_name(&self) -> &str {
        match self {
            BundleOutput::Chunk(chunk) => &chunk.file_name,
            BundleOutput::Asset(asset) => &asset.file_name,
        }
    }

    pub fn is_asset(&self) -> bool {
        matches!(self, BundleOutput::Asset(_))
    }
}

/// A completed build's output set, keyed by emitted file name. Iteration
/// order is the host's emission order.
pub type OutputBundle = IndexMap<String, BundleOutput>;

/// The host's globals-resolution config: either a static specifier-to-symbol
/// map or a resolver function.
pub enum Globals {
    Map(AHashMap<String, String>),
    Resolver(Box<dyn Fn(&str) -> Option<String> + Send + Sync>),
}

impl Globals {
    /// Looks up the global symbol name for a specifier. Empty symbol names
    /// count as "no global".
    pub fn resolve(&self, specifier: &str) -> Option<String> {
        let symbol = match self {
            Globals::Map(map) => map.get(specifier).cloned(),
            Globals::Resolver(resolver) => resolver(specifier),
        };
        symbol.filter(|name| !name.is_empty())
    }
}

impl Default for Globals {
    fn default() -> Self {
        Globals::Map(AHashMap::new())
    }
}

impl std::fmt::Debug for Globals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Globals::Map(map) => f.debug_tuple("Map").field(&map.len()).finish(),
            Globals::Resolver(_) => f.debug_tuple("Resolver").finish(),
        }
    }
}

/// Active output options of the producing build.
#[derive(Debug, Default)]
pub struct OutputOptions {
    /// Output serialization format; `None` falls back to [`ModuleFormat::Es`].
    pub format: Option<ModuleFormat>,
    pub globals: Globals,
}
