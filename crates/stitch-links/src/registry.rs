//! Symbol → URL registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use stitch_model::DigestedMetadata;

/// Policy applied when a symbol is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// The later registration replaces the earlier one. This is how external
    /// mappings supplement or override generated internal ones without a
    /// removal API.
    #[default]
    LastWriteWins,
}

/// Outcome of a registry lookup.
///
/// Unresolved symbols are an expected state, not a failure; callers branch on
/// the two arms instead of handling an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The symbol maps to this URL.
    Resolved(&'a str),
    /// The symbol is not registered.
    Unresolved,
}

impl<'a> Resolution<'a> {
    /// The resolved URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&'a str> {
        match *self {
            Self::Resolved(url) => Some(url),
            Self::Unresolved => None,
        }
    }

    /// True when the lookup found a mapping.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Per-run table mapping symbol names to URLs.
///
/// Populated once per run (seed, then manual additions), read-only while
/// pages render. Lookups are exact-name only.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    entries: HashMap<String, String>,
    on_conflict: OnConflict,
}

impl LinkRegistry {
    /// Create an empty registry with the default conflict policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an internal URL for every class in the metadata.
    ///
    /// The URL is the class name itself: output pages are named after the
    /// entity, so the identity mapping is the canonical internal link.
    /// Idempotent: seeding twice produces the same table.
    pub fn seed(&mut self, metadata: &DigestedMetadata) {
        for class in metadata.classes() {
            self.add(class.name.clone(), class.name.clone());
        }
        tracing::debug!(classes = metadata.len(), "Seeded link registry");
    }

    /// Register or overwrite a symbol → URL mapping.
    ///
    /// The URL is an opaque string; no validation is applied.
    pub fn add(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let url = url.into();
        match self.entries.entry(name.into()) {
            Entry::Occupied(mut slot) => match self.on_conflict {
                OnConflict::LastWriteWins => {
                    if *slot.get() != url {
                        tracing::debug!(
                            symbol = %slot.key(),
                            from = %slot.get(),
                            to = %url,
                            "Symbol remapped"
                        );
                    }
                    slot.insert(url);
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(url);
            }
        }
    }

    /// Exact-name lookup.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        match self.entries.get(name) {
            Some(url) => Resolution::Resolved(url),
            None => Resolution::Unresolved,
        }
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no symbols are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use stitch_model::ClassEntity;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_registry_is_send_sync() {
        assert_send_sync::<LinkRegistry>();
    }

    fn sample_metadata() -> DigestedMetadata {
        DigestedMetadata::from_classes(vec![ClassEntity::new("Foo"), ClassEntity::new("Bar")])
            .unwrap()
    }

    #[test]
    fn test_seed_registers_identity_urls() {
        let mut registry = LinkRegistry::new();

        registry.seed(&sample_metadata());

        assert_eq!(registry.resolve("Foo"), Resolution::Resolved("Foo"));
        assert_eq!(registry.resolve("Bar"), Resolution::Resolved("Bar"));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let metadata = sample_metadata();
        let mut registry = LinkRegistry::new();

        registry.seed(&metadata);
        registry.seed(&metadata);

        assert_eq!(registry.len(), 2);
        for class in metadata.classes() {
            assert_eq!(
                registry.resolve(&class.name),
                Resolution::Resolved(class.name.as_str())
            );
        }
    }

    #[test]
    fn test_add_registers_external_url() {
        let mut registry = LinkRegistry::new();

        registry.add("Bar", "https://example.com/bar");

        assert_eq!(
            registry.resolve("Bar"),
            Resolution::Resolved("https://example.com/bar")
        );
    }

    #[test]
    fn test_add_overwrites_last_write_wins() {
        let mut registry = LinkRegistry::new();

        registry.add("X", "urlA");
        registry.add("X", "urlB");

        assert_eq!(registry.resolve("X"), Resolution::Resolved("urlB"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_overrides_seeded_entry() {
        let mut registry = LinkRegistry::new();
        registry.seed(&sample_metadata());

        registry.add("Foo", "https://docs.example.com/foo");

        assert_eq!(
            registry.resolve("Foo"),
            Resolution::Resolved("https://docs.example.com/foo")
        );
    }

    #[test]
    fn test_resolve_unregistered_is_unresolved() {
        let mut registry = LinkRegistry::new();
        registry.seed(&sample_metadata());

        assert_eq!(registry.resolve("Baz"), Resolution::Unresolved);
    }

    #[test]
    fn test_resolve_is_exact_match_only() {
        let mut registry = LinkRegistry::new();
        registry.add("Parser", "Parser");

        assert_eq!(registry.resolve("parser"), Resolution::Unresolved);
        assert_eq!(registry.resolve("Parse"), Resolution::Unresolved);
        assert_eq!(registry.resolve("ParserExt"), Resolution::Unresolved);
    }

    #[test]
    fn test_independent_instances_do_not_share_state() {
        let mut first = LinkRegistry::new();
        let second = LinkRegistry::new();

        first.add("Foo", "Foo");

        assert_eq!(second.resolve("Foo"), Resolution::Unresolved);
    }

    #[test]
    fn test_default_conflict_policy() {
        assert_eq!(OnConflict::default(), OnConflict::LastWriteWins);
    }

    #[test]
    fn test_resolution_accessors() {
        let resolved = Resolution::Resolved("Foo");
        let unresolved = Resolution::Unresolved;

        assert!(resolved.is_resolved());
        assert_eq!(resolved.url(), Some("Foo"));
        assert!(!unresolved.is_resolved());
        assert_eq!(unresolved.url(), None);
    }
}
