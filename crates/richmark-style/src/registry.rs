//! Named style lookup with an optional on-demand provider.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::StyleKind;

/// Supplies a style on a registry miss. The `bool` says whether to cache it.
pub type StyleProvider = Box<dyn Fn(&str) -> Option<(StyleKind, bool)> + Send + Sync>;

/// Styles registered by name.
///
/// Lookups take `&self`; styles supplied by the provider are cached behind a
/// lock when the provider asks for it.
///
/// # Example
///
/// ```
/// use richmark_style::{Style, StyleKind, StyleRegistry};
///
/// let registry = StyleRegistry::new().with_provider(|name| {
///     name.strip_prefix("size-")
///         .and_then(|n| n.parse().ok())
///         .map(|size| (StyleKind::Plain(Style::anonymous().with_size(size)), true))
/// });
/// registry.register("title", Style::named("title").with_size(24.0));
///
/// assert!(registry.get("title").is_some());
/// assert!(registry.get("size-9").is_some());
/// assert!(registry.contains("size-9"));
/// assert!(registry.get("unknown").is_none());
/// ```
#[derive(Default)]
pub struct StyleRegistry {
    styles: RwLock<HashMap<String, Arc<StyleKind>>>,
    provider: Option<StyleProvider>,
}

impl StyleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&str) -> Option<(StyleKind, bool)> + Send + Sync + 'static,
    {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Register `kind` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, kind: impl Into<StyleKind>) -> Option<Arc<StyleKind>> {
        self.styles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(kind.into()))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<StyleKind>> {
        self.styles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Whether `name` is registered or cached. Does not consult the provider.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.styles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Look up `name`, asking the provider on a miss.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<StyleKind>> {
        if let Some(kind) = self
            .styles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Some(Arc::clone(kind));
        }

        let provider = self.provider.as_ref()?;
        let (kind, cache) = provider(name)?;
        let kind = Arc::new(kind);
        if cache {
            tracing::debug!(style = name, "caching provided style");
            self.styles
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_owned(), Arc::clone(&kind));
        }
        Some(kind)
    }

    /// Look up each of `names`, skipping the ones not found.
    #[must_use]
    pub fn get_many<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Vec<Arc<StyleKind>> {
        names.into_iter().filter_map(|name| self.get(name)).collect()
    }

    /// Registered and cached names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .styles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("names", &self.names())
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Style;

    #[test]
    fn test_register_replaces() {
        let registry = StyleRegistry::new();
        assert!(registry.register("a", Style::anonymous()).is_none());
        assert!(registry.register("a", Style::anonymous().with_size(2.0)).is_some());
        assert_eq!(registry.names(), vec!["a".to_owned()]);
    }

    #[test]
    fn test_provider_cache_flag() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = StyleRegistry::new().with_provider(move |name| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some((StyleKind::Plain(Style::anonymous()), name == "cached"))
        });

        assert!(registry.get("cached").is_some());
        assert!(registry.get("cached").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(registry.get("fresh").is_some());
        assert!(registry.get("fresh").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!registry.contains("fresh"));
    }

    #[test]
    fn test_get_many_skips_missing() {
        let registry = StyleRegistry::new();
        registry.register("a", Style::anonymous());
        registry.register("b", Style::anonymous());
        assert_eq!(registry.get_many(["a", "zz", "b"]).len(), 2);
    }

    #[test]
    fn test_remove() {
        let registry = StyleRegistry::new();
        registry.register("a", Style::anonymous());
        assert!(registry.remove("a").is_some());
        assert!(registry.get("a").is_none());
    }
}
