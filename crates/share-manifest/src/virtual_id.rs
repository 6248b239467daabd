//! Virtual module identifier grammar
//!
//! Consumer builds address manifests through two identifier families:
//!
//! - singular, sugar for "the first/only manifest" (internal key `0`):
//!   `virtual:shared-manifest`, `virtual:shared-manifest/assets`,
//!   `virtual:shared-manifest/chunks`
//! - plural, addressing the whole registry or one keyed manifest:
//!   `virtual:shared-manifests`, `virtual:shared-manifests/<key>`,
//!   `virtual:shared-manifests/<key>/assets`,
//!   `virtual:shared-manifests/<key>/chunks`
//!
//! Resolution rewrites the singular form into the plural form, so there is
//! exactly one internal addressing scheme, and prefixes resolved ids with a
//! NUL sentinel meaning "do not re-resolve, serve directly".

use once_cell::sync::Lazy;
use regex::Regex;
use share_manifest_core::ManifestField;

pub const VIRTUAL_MODULE_ID: &str = "virtual:shared-manifest";
pub const VIRTUAL_MODULES_ID: &str = "virtual:shared-manifests";
pub const RESOLVED_ID_PREFIX: &str = "\0";

#[allow(clippy::expect_used)]
static VIRTUAL_MODULE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^virtual:shared-manifest(?:/(assets|chunks))?$").expect("static pattern")
});

#[allow(clippy::expect_used)]
static VIRTUAL_MODULES_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^virtual:shared-manifests(?:/([^/]+)(?:/(assets|chunks))?)?$")
        .expect("static pattern")
});

#[allow(clippy::expect_used)]
static RESOLVED_MODULES_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\x00virtual:shared-manifests(?:/([^/]+)(?:/(assets|chunks))?)?$")
        .expect("static pattern")
});

pub fn is_virtual_module_id(id: &str) -> bool {
    VIRTUAL_MODULE_ID_RE.is_match(id)
}

pub fn is_virtual_modules_id(id: &str) -> bool {
    VIRTUAL_MODULES_ID_RE.is_match(id)
}

pub fn is_resolved_modules_id(id: &str) -> bool {
    RESOLVED_MODULES_ID_RE.is_match(id)
}

/// Rewrites a virtual identifier into its resolved (NUL-prefixed, plural)
/// form. Singular ids resolve to internal key `0`; anything that is not a
/// virtual identifier returns `None`.
pub fn resolve_virtual_id(id: &str) -> Option<String> {
    if is_virtual_module_id(id) {
        let suffix = &id[VIRTUAL_MODULE_ID.len()..];
        return Some(format!(
            "{RESOLVED_ID_PREFIX}{VIRTUAL_MODULES_ID}/0{suffix}"
        ));
    }
    if is_virtual_modules_id(id) {
        return Some(format!("{RESOLVED_ID_PREFIX}{id}"));
    }
    None
}

/// Addressing parsed out of a resolved identifier: which manifest (if any)
/// and which of its fields (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestQuery {
    pub key: Option<String>,
    pub field: Option<ManifestField>,
}

/// Extracts `{key, field}` from a resolved identifier. Non-resolved ids
/// (including un-prefixed virtual ids) return `None`.
pub fn extract_query(id: &str) -> Option<ManifestQuery> {
    let captures = RESOLVED_MODULES_ID_RE.captures(id)?;
    Some(ManifestQuery {
        key: captures.get(1).map(|m| m.as_str().to_string()),
        field: captures.get(2).and_then(|m| ManifestField::parse(m.as_str())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_ids_match() {
        assert!(is_virtual_module_id("virtual:shared-manifest"));
        assert!(is_virtual_module_id("virtual:shared-manifest/assets"));
        assert!(is_virtual_module_id("virtual:shared-manifest/chunks"));
    }

    #[test]
    fn singular_rejects_other_ids() {
        assert!(!is_virtual_module_id("virtual:shared-manifests"));
        assert!(!is_virtual_module_id("virtual:shared-manifests/key"));
        assert!(!is_virtual_module_id("virtual:shared-manifest/"));
        assert!(!is_virtual_module_id("virtual:shared-manifest/assets/"));
        assert!(!is_virtual_module_id("virtual:shared-manifest/code"));
        assert!(!is_virtual_module_id("some-other-id"));
        assert!(!is_virtual_module_id(""));
    }

    #[test]
    fn plural_ids_match() {
        assert!(is_virtual_modules_id("virtual:shared-manifests"));
        assert!(is_virtual_modules_id("virtual:shared-manifests/key"));
        assert!(is_virtual_modules_id("virtual:shared-manifests/key/assets"));
        assert!(is_virtual_modules_id("virtual:shared-manifests/key/chunks"));
    }

    #[test]
    fn plural_rejects_other_ids() {
        assert!(!is_virtual_modules_id("virtual:shared-manifest"));
        assert!(!is_virtual_modules_id("virtual:shared-manifest/assets"));
        assert!(!is_virtual_modules_id("virtual:shared-manifests/"));
        assert!(!is_virtual_modules_id("virtual:shared-manifests/key/"));
        assert!(!is_virtual_modules_id("virtual:shared-manifests/key/code"));
        assert!(!is_virtual_modules_id("regular-module-id"));
        assert!(!is_virtual_modules_id(""));
    }

    #[test]
    fn resolved_ids_match_only_with_prefix() {
        assert!(is_resolved_modules_id("\0virtual:shared-manifests"));
        assert!(is_resolved_modules_id("\0virtual:shared-manifests/key"));
        assert!(!is_resolved_modules_id("virtual:shared-manifests"));
        assert!(!is_resolved_modules_id("\0virtual:shared-manifest"));
        assert!(!is_resolved_modules_id(""));
    }

    #[test]
    fn singular_resolves_to_first_manifest() {
        assert_eq!(
            resolve_virtual_id("virtual:shared-manifest").as_deref(),
            Some("\0virtual:shared-manifests/0")
        );
        assert_eq!(
            resolve_virtual_id("virtual:shared-manifest/assets").as_deref(),
            Some("\0virtual:shared-manifests/0/assets")
        );
        assert_eq!(
            resolve_virtual_id("virtual:shared-manifest/chunks").as_deref(),
            Some("\0virtual:shared-manifests/0/chunks")
        );
    }

    #[test]
    fn plural_resolves_by_prefixing() {
        assert_eq!(
            resolve_virtual_id("virtual:shared-manifests/my-key/chunks").as_deref(),
            Some("\0virtual:shared-manifests/my-key/chunks")
        );
        assert_eq!(
            resolve_virtual_id("virtual:shared-manifests").as_deref(),
            Some("\0virtual:shared-manifests")
        );
    }

    #[test]
    fn non_virtual_ids_do_not_resolve() {
        assert_eq!(resolve_virtual_id("./app.js"), None);
        assert_eq!(resolve_virtual_id("react"), None);
        assert_eq!(resolve_virtual_id(""), None);
    }

    #[test]
    fn extract_key_and_field() {
        assert_eq!(
            extract_query("\0virtual:shared-manifests/my-key/assets"),
            Some(ManifestQuery {
                key: Some("my-key".to_string()),
                field: Some(ManifestField::Assets),
            })
        );
        assert_eq!(
            extract_query("\0virtual:shared-manifests/my-key/chunks"),
            Some(ManifestQuery {
                key: Some("my-key".to_string()),
                field: Some(ManifestField::Chunks),
            })
        );
    }

    #[test]
    fn extract_key_without_field() {
        assert_eq!(
            extract_query("\0virtual:shared-manifests/another-key"),
            Some(ManifestQuery {
                key: Some("another-key".to_string()),
                field: None,
            })
        );
    }

    #[test]
    fn extract_without_key_addresses_whole_registry() {
        assert_eq!(
            extract_query("\0virtual:shared-manifests"),
            Some(ManifestQuery { key: None, field: None })
        );
    }

    #[test]
    fn extract_rejects_unresolved_ids() {
        assert_eq!(extract_query("regular-module-id"), None);
        assert_eq!(extract_query("virtual:shared-manifests"), None);
        assert_eq!(extract_query("virtual:shared-manifest"), None);
        assert_eq!(extract_query("\0virtual:shared-manifest"), None);
        assert_eq!(extract_query(""), None);
    }
}
