//! Keyed manifest registry
//!
//! Process-lifetime store of [`Manifest`] snapshots. Internal keys are
//! auto-incrementing integers (as strings) assigned in registration order;
//! callers may additionally bind an alias key, which must be unique for the
//! registry's lifetime and shadows the internal key in enumeration. All
//! reads hand out independent copies — mutating a returned snapshot never
//! touches live state.
//!
//! One registry belongs to one factory instance. There is no process-wide
//! singleton; independent instances are fully isolated even when they use
//! identical alias keys.

use indexmap::IndexMap;

use crate::errors::ShareManifestError;
use crate::types::{Manifest, ManifestAssets, ManifestChunks, RecordKey};

#[derive(Debug, Default)]
pub struct ManifestRegistry {
    manifests: IndexMap<String, Manifest>,
    /// Alias key -> internal key. Registration-ordered so enumeration stays
    /// deterministic.
    aliases: IndexMap<String, String>,
    next_key: u64,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new producer slot, assigning the next internal key and
    /// creating its (empty) manifest.
    ///
    /// Internal keys are monotonic and never reused. A supplied alias that
    /// is already bound fails immediately with
    /// [`ShareManifestError::DuplicateKey`]; an alias equal to the slot's
    /// own internal key is an aliasing no-op, not a collision.
    pub fn register(
        &mut self,
        alias: Option<&RecordKey>,
    ) -> Result<String, ShareManifestError> {
        let internal = self.next_key.to_string();
        self.next_key += 1;

        if let Some(key) = alias {
            let canonical = key.canonical();
            if canonical != internal {
                if self.aliases.contains_key(&canonical) {
                    return Err(ShareManifestError::DuplicateKey { key: canonical });
                }
                self.aliases.insert(canonical, internal.clone());
            }
        }

        self.manifests.insert(internal.clone(), Manifest::default());
        Ok(internal)
    }

    /// Resets the manifest under `internal_key` to empty. Called at the
    /// owning producer's build-start so incremental rebuilds reuse the key.
    pub fn clear(&mut self, internal_key: &str) {
        if let Some(manifest) = self.manifests.get_mut(internal_key) {
            *manifest = Manifest::default();
        }
    }

    /// Replaces the manifest under `internal_key` with a freshly built
    /// snapshot. Called when the owning producer's outputs are finalized.
    pub fn commit(&mut self, internal_key: &str, manifest: Manifest) {
        self.manifests.insert(internal_key.to_string(), manifest);
    }

    /// Resolves a canonical key through the alias table, falling back to
    /// treating it as an internal key directly.
    fn lookup(&self, canonical: &str) -> Option<&Manifest> {
        let internal = self
            .aliases
            .get(canonical)
            .map_or(canonical, String::as_str);
        self.manifests.get(internal)
    }

    /// Returns an independent copy of the manifest under `key`, or `None`
    /// when the key is unknown.
    pub fn get(&self, key: &RecordKey) -> Option<Manifest> {
        self.lookup(&key.canonical()).cloned()
    }

    /// Returns an independent copy of one field of the manifest under `key`.
    pub fn get_chunks(&self, key: &RecordKey) -> Option<ManifestChunks> {
        self.lookup(&key.canonical()).map(|m| m.chunks.clone())
    }

    /// Returns an independent copy of one field of the manifest under `key`.
    pub fn get_assets(&self, key: &RecordKey) -> Option<ManifestAssets> {
        self.lookup(&key.canonical()).map(|m| m.assets.clone())
    }

    /// Returns an independent copy of every manifest, addressed by alias key
    /// where one exists, else by internal key.
    pub fn get_all(&self) -> IndexMap<String, Manifest> {
        let mut cloned = self.manifests.clone();

        // Aliases shadow internal keys in enumeration.
        for (alias, internal) in &self.aliases {
            if let Some(manifest) = cloned.shift_remove(internal) {
                cloned.insert(alias.clone(), manifest);
            }
        }

        cloned
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ManifestChunk, ModuleFormat};
    use smallvec::SmallVec;
    use std::sync::Arc;

    fn chunk(file_name: &str) -> ManifestChunk {
        ManifestChunk {
            name: Arc::from(file_name.trim_end_matches(".js")),
            file_name: Arc::from(file_name),
            is_entry: true,
            is_dynamic_entry: false,
            format: ModuleFormat::Es,
            imports: Vec::new(),
            dynamic_imports: Vec::new(),
            exports: SmallVec::new(),
            code: Arc::from(""),
        }
    }

    fn manifest_with(file_name: &str) -> Manifest {
        let mut manifest = Manifest::default();
        manifest
            .chunks
            .insert(Arc::from(file_name), chunk(file_name));
        manifest
    }

    #[test]
    fn internal_keys_are_monotonic() {
        let mut registry = ManifestRegistry::new();
        assert_eq!(registry.register(None).ok(), Some("0".to_string()));
        assert_eq!(registry.register(None).ok(), Some("1".to_string()));
        assert_eq!(registry.register(None).ok(), Some("2".to_string()));
    }

    #[test]
    fn registration_creates_empty_manifest() {
        let mut registry = ManifestRegistry::new();
        let Ok(key) = registry.register(None) else {
            return;
        };
        assert_eq!(
            registry.get(&RecordKey::from(key.as_str())),
            Some(Manifest::default())
        );
    }

    #[test]
    fn duplicate_alias_is_a_configuration_error() {
        let mut registry = ManifestRegistry::new();
        let first = registry.register(Some(&RecordKey::from("same-key")));
        assert!(first.is_ok());

        let second = registry.register(Some(&RecordKey::from("same-key")));
        match second {
            Err(ShareManifestError::DuplicateKey { key }) => assert_eq!(key, "same-key"),
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn alias_equal_to_own_internal_key_is_a_no_op() {
        let mut registry = ManifestRegistry::new();
        let first = registry.register(Some(&RecordKey::from("0")));
        assert_eq!(first.ok(), Some("0".to_string()));

        // No alias row was created, so "0" stays free for direct lookup and
        // a later "0" alias on a different slot is a real collision check
        // against an empty table.
        registry.commit("0", manifest_with("main.js"));
        let fetched = registry.get(&RecordKey::from("0"));
        assert!(fetched.is_some_and(|m| m.chunks.contains_key("main.js")));
    }

    #[test]
    fn numeric_keys_collapse_to_string_form() {
        let mut registry = ManifestRegistry::new();
        let registered = registry.register(Some(&RecordKey::from(123i64)));
        assert!(registered.is_ok());
        registry.commit("0", manifest_with("main.js"));

        let by_number = registry.get(&RecordKey::from(123i64));
        let by_string = registry.get(&RecordKey::from("123"));
        assert!(by_number.is_some());
        assert_eq!(by_number, by_string);
    }

    #[test]
    fn boolean_keys_collapse_once_coerced() {
        let mut registry = ManifestRegistry::new();
        assert!(registry.register(Some(&RecordKey::from(true))).is_ok());
        registry.commit("0", manifest_with("main.js"));

        assert!(registry.get(&RecordKey::from(true)).is_some());
        assert!(registry.get(&RecordKey::from("true")).is_some());
        // A string "true" alias would now collide with the coerced boolean.
        let collision = registry.register(Some(&RecordKey::from("true")));
        assert!(matches!(
            collision,
            Err(ShareManifestError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn unknown_keys_return_none() {
        let registry = ManifestRegistry::new();
        assert_eq!(registry.get(&RecordKey::from("missing")), None);
        assert_eq!(registry.get_chunks(&RecordKey::from("missing")), None);
        assert_eq!(registry.get_assets(&RecordKey::from("missing")), None);
    }

    #[test]
    fn reads_are_independent_copies() {
        let mut registry = ManifestRegistry::new();
        let Ok(key) = registry.register(None) else {
            return;
        };
        registry.commit(&key, manifest_with("main.js"));

        let record_key = RecordKey::from(key.as_str());
        let mut first = registry.get(&record_key).unwrap_or_default();
        let second = registry.get(&record_key).unwrap_or_default();
        assert_eq!(first, second);

        first.chunks.insert(Arc::from("rogue.js"), chunk("rogue.js"));
        first
            .chunks
            .shift_remove("main.js");

        let third = registry.get(&record_key).unwrap_or_default();
        assert_eq!(second, third, "registry state must survive snapshot mutation");
        assert!(third.chunks.contains_key("main.js"));
        assert!(!third.chunks.contains_key("rogue.js"));
    }

    #[test]
    fn get_all_shadows_internal_keys_with_aliases() {
        let mut registry = ManifestRegistry::new();
        assert!(registry.register(Some(&RecordKey::from("client"))).is_ok());
        assert!(registry.register(None).is_ok());
        registry.commit("0", manifest_with("client.js"));
        registry.commit("1", manifest_with("server.js"));

        let all = registry.get_all();
        assert_eq!(all.len(), 2);
        assert!(all.contains_key("client"));
        assert!(!all.contains_key("0"), "alias shadows the internal key");
        assert!(all.contains_key("1"));
    }

    #[test]
    fn aliased_and_internal_key_resolve_to_same_manifest() {
        let mut registry = ManifestRegistry::new();
        assert!(registry.register(Some(&RecordKey::from("client"))).is_ok());
        registry.commit("0", manifest_with("client.js"));

        assert_eq!(
            registry.get(&RecordKey::from("client")),
            registry.get(&RecordKey::from("0"))
        );
    }

    #[test]
    fn clear_resets_without_dropping_the_key() {
        let mut registry = ManifestRegistry::new();
        let Ok(key) = registry.register(None) else {
            return;
        };
        registry.commit(&key, manifest_with("main.js"));
        registry.clear(&key);

        assert_eq!(
            registry.get(&RecordKey::from(key.as_str())),
            Some(Manifest::default())
        );
    }

    #[test]
    fn per_field_reads_narrow_to_the_requested_map() {
        let mut registry = ManifestRegistry::new();
        let Ok(key) = registry.register(None) else {
            return;
        };
        registry.commit(&key, manifest_with("main.js"));

        let record_key = RecordKey::from(key.as_str());
        let chunks = registry.get_chunks(&record_key);
        assert!(chunks.is_some_and(|c| c.len() == 1 && c.contains_key("main.js")));

        let assets = registry.get_assets(&record_key);
        assert!(assets.is_some_and(|a| a.is_empty()));
    }

    #[test]
    fn instances_are_isolated() {
        let mut first = ManifestRegistry::new();
        let mut second = ManifestRegistry::new();
        assert!(first.register(Some(&RecordKey::from("app"))).is_ok());
        assert!(
            second.register(Some(&RecordKey::from("app"))).is_ok(),
            "identical alias keys must not collide across registries"
        );
    }
}
