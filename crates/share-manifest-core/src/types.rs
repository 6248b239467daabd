//! Manifest type system for the share-manifest registry
//!
//! This module provides:
//! - The typed import graph records (builtin / global / local / third-party)
//! - The per-build `Manifest` snapshot (chunks map + assets map)
//! - `Arc<str>` interning for string deduplication across snapshots
//! - The boundary key type and its single canonical-form function

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// IMPORT RECORDS - Typed dependency edges
// =============================================================================

/// One classified dependency edge of a chunk.
///
/// The variant tag serializes as `importType` so consumer-side snapshots carry
/// the discriminant inline, e.g.
/// `{"importName":"foo.js","importType":"local","importPath":"foo.js"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "importType", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ImportRecord {
    /// Resolves to a runtime-platform built-in module. `module_name` is the
    /// query-stripped specifier; `import_name` keeps the original.
    Builtin {
        import_name: Arc<str>,
        module_name: Arc<str>,
    },
    /// Mapped by the build configuration to a pre-existing global symbol.
    Global {
        import_name: Arc<str>,
        global_name: Arc<str>,
    },
    /// Resolves to another chunk produced by the same build.
    Local {
        import_name: Arc<str>,
        import_path: Arc<str>,
    },
    /// Not a builtin, not a declared global and not produced by this build.
    /// `package_name` is absent for malformed scoped specifiers; absence is
    /// valid, displayable data.
    ThirdParty {
        import_name: Arc<str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        package_name: Option<Arc<str>>,
    },
}

impl ImportRecord {
    /// The original, query-preserving import specifier.
    pub fn import_name(&self) -> &str {
        match self {
            ImportRecord::Builtin { import_name, .. }
            | ImportRecord::Global { import_name, .. }
            | ImportRecord::Local { import_name, .. }
            | ImportRecord::ThirdParty { import_name, .. } => import_name,
        }
    }
}

// =============================================================================
// MANIFEST - One build invocation's output snapshot
// =============================================================================

/// Output serialization format of a chunk, mirroring the host tool's
/// internal module formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Amd,
    Cjs,
    #[default]
    Es,
    Iife,
    System,
    Umd,
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleFormat::Amd => "amd",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Es => "es",
            ModuleFormat::Iife => "iife",
            ModuleFormat::System => "system",
            ModuleFormat::Umd => "umd",
        };
        f.write_str(name)
    }
}

/// A non-code emitted output. `name` is the asset's first logical name,
/// falling back to its emitted file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAsset {
    pub name: Arc<str>,
    pub file_name: Arc<str>,
}

/// One unit of bundled, emitted code output with its classified dependency
/// edges. `imports`/`dynamic_imports` preserve the build's own declaration
/// order; `code` is the empty string when the producer opted out of
/// embedding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestChunk {
    pub name: Arc<str>,
    pub file_name: Arc<str>,
    pub is_entry: bool,
    pub is_dynamic_entry: bool,
    pub format: ModuleFormat,
    pub imports: Vec<ImportRecord>,
    pub dynamic_imports: Vec<ImportRecord>,
    pub exports: SmallVec<[Arc<str>; 4]>,
    pub code: Arc<str>,
}

pub type ManifestChunks = IndexMap<Arc<str>, ManifestChunk>;
pub type ManifestAssets = IndexMap<Arc<str>, ManifestAsset>;

/// Snapshot of exactly one build invocation's output set at the moment the
/// build finished emitting. Map iteration order mirrors emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub chunks: ManifestChunks,
    pub assets: ManifestAssets,
}

/// Addressable sub-map of a [`Manifest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestField {
    Chunks,
    Assets,
}

impl ManifestField {
    /// Parses `"chunks"` / `"assets"`; anything else is not a field.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "chunks" => Some(ManifestField::Chunks),
            "assets" => Some(ManifestField::Assets),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ManifestField::Chunks => "chunks",
            ManifestField::Assets => "assets",
        }
    }
}

// =============================================================================
// RECORD KEYS - Boundary normalization
// =============================================================================

/// Caller-supplied manifest key, covering the dynamic key domain of the host
/// configuration surface. Normalized to one canonical string representation
/// immediately at the registry boundary via [`RecordKey::canonical`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKey {
    Str(String),
    Int(i64),
    BigInt(i128),
    Float(f64),
    Bool(bool),
    Null,
}

impl RecordKey {
    /// The single pure raw-to-canonical mapping rule. String keys pass
    /// through unchanged; every other key formats the way the host
    /// configuration language stringifies it (`"true"`, `"null"`, `"123"`,
    /// `"NaN"`, `"Infinity"`), so `123` and `"123"` collapse to the same
    /// lookup key.
    pub fn canonical(&self) -> String {
        match self {
            RecordKey::Str(s) => s.clone(),
            RecordKey::Int(n) => n.to_string(),
            RecordKey::BigInt(n) => n.to_string(),
            RecordKey::Float(f) => canonical_float(*f),
            RecordKey::Bool(b) => b.to_string(),
            RecordKey::Null => "null".to_string(),
        }
    }
}

fn canonical_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 9e15 {
        // Integral values print without a fractional part.
        return format!("{:.0}", f);
    }
    format!("{}", f)
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        RecordKey::Str(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        RecordKey::Str(value)
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        RecordKey::Int(value)
    }
}

impl From<i32> for RecordKey {
    fn from(value: i32) -> Self {
        RecordKey::Int(i64::from(value))
    }
}

impl From<u64> for RecordKey {
    fn from(value: u64) -> Self {
        RecordKey::BigInt(i128::from(value))
    }
}

impl From<i128> for RecordKey {
    fn from(value: i128) -> Self {
        RecordKey::BigInt(value)
    }
}

impl From<f64> for RecordKey {
    fn from(value: f64) -> Self {
        RecordKey::Float(value)
    }
}

impl From<bool> for RecordKey {
    fn from(value: bool) -> Self {
        RecordKey::Bool(value)
    }
}
