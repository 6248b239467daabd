//! Import classification
//!
//! Pure functions turning a raw import specifier plus build context into one
//! typed [`ImportRecord`]. Classification precedence is fixed:
//! builtin > declared-global > produced-by-this-build > third-party.
//! An import resolving to an asset output is omitted entirely (`None`) —
//! assets are tracked separately from the import graph.

use std::sync::Arc;

use crate::bundle::{BundleOutput, Globals, OutputBundle};
use crate::types::ImportRecord;

/// Runtime builtin module names, sorted for binary search.
const BUILTIN_MODULES: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Platform namespace prefix accepted in front of builtin module names.
const BUILTIN_PREFIX: &str = "node:";

/// Strips a query-string suffix (everything from the first `?` onward).
pub fn strip_query(specifier: &str) -> &str {
    match specifier.find('?') {
        Some(idx) => &specifier[..idx],
        None => specifier,
    }
}

/// Whether the specifier names a runtime builtin module, with or without the
/// platform namespace prefix.
pub fn is_builtin_module(specifier: &str) -> bool {
    let name = specifier.strip_prefix(BUILTIN_PREFIX).unwrap_or(specifier);
    BUILTIN_MODULES.binary_search(&name).is_ok()
}

/// Derives the package name of a bare third-party specifier.
///
/// Scoped specifiers keep the `@scope/name` prefix; unscoped specifiers keep
/// only the first path segment. Returns `None` for relative/absolute
/// specifiers and for malformed scoped specifiers (`@`, `@/`, `@scope/`).
pub fn package_name(specifier: &str) -> Option<String> {
    if specifier.is_empty() || specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }

    if let Some(scoped) = specifier.strip_prefix('@') {
        let (scope, rest) = scoped.split_once('/')?;
        if scope.is_empty() {
            return None;
        }
        let name = rest.split('/').next().unwrap_or(rest);
        if name.is_empty() {
            return None;
        }
        return Some(format!("@{}/{}", scope, name));
    }

    specifier.split('/').next().map(str::to_string)
}

/// Classifies one raw import specifier against the current build's output
/// set and globals configuration.
///
/// Returns `None` when the import must be omitted from the import list: it
/// resolves to an asset output, or it is a relative/absolute specifier that
/// did not resolve to any output.
pub fn classify(
    specifier: &str,
    bundle: &OutputBundle,
    globals: &Globals,
) -> Option<ImportRecord> {
    let stripped = strip_query(specifier);

    if is_builtin_module(stripped) {
        return Some(ImportRecord::Builtin {
            import_name: Arc::from(specifier),
            module_name: Arc::from(stripped),
        });
    }

    if let Some(global_name) = globals.resolve(stripped) {
        return Some(ImportRecord::Global {
            import_name: Arc::from(specifier),
            global_name: Arc::from(global_name.as_str()),
        });
    }

    match bundle.get(stripped) {
        Some(BundleOutput::Chunk(_)) => {
            return Some(ImportRecord::Local {
                import_name: Arc::from(specifier),
                import_path: Arc::from(stripped),
            });
        }
        // Imports resolving to assets are tracked in the assets map only.
        Some(BundleOutput::Asset(_)) => return None,
        None => {}
    }

    // Relative specifiers that were not resolved to an output have nothing
    // meaningful to record.
    if stripped.starts_with('.') || stripped.starts_with('/') {
        return None;
    }

    Some(ImportRecord::ThirdParty {
        import_name: Arc::from(specifier),
        package_name: package_name(stripped).map(|name| Arc::from(name.as_str())),
    })
}
