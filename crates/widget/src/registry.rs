//! Process-wide map from site identifier to its live cart.
//!
//! The embedding snippet can end up on a page twice; the registry makes sure
//! the second copy gets the first copy's instance instead of mounting a
//! duplicate cart over it.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::config::CartConfiguration;
use crate::error::Diagnostic;
use crate::instance::CartInstance;
use crate::page::Page;

static GLOBAL: LazyLock<InstanceRegistry> = LazyLock::new(InstanceRegistry::new);

/// Registry of live cart instances, at most one per site identifier.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: Mutex<HashMap<String, Arc<CartInstance>>>,
}

impl InstanceRegistry {
    /// An empty registry, independent of the global one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created empty on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Return the instance for `config.site_identifier`, mounting a new one
    /// on `page` if the site has none yet.
    ///
    /// Asking again for a registered site returns the existing instance
    /// untouched; `config` and `page` are ignored and a
    /// [`Diagnostic::DuplicateInstance`] warning is raised.
    pub fn create_or_get(&self, config: CartConfiguration, page: Arc<dyn Page>) -> Arc<CartInstance> {
        let mut instances = self.lock();

        if let Some(existing) = instances.get(&config.site_identifier) {
            let diagnostic = Diagnostic::DuplicateInstance {
                site: config.site_identifier.clone(),
            };
            warn!("{diagnostic}");
            existing.record(diagnostic);
            return Arc::clone(existing);
        }

        let site = config.site_identifier.clone();
        let instance = Arc::new(CartInstance::mount(config, page));
        info!(site = %site, "Cart instance created");
        instances.insert(site, Arc::clone(&instance));
        instance
    }

    /// Look up a site's instance without creating one.
    #[must_use]
    pub fn get(&self, site_identifier: &str) -> Option<Arc<CartInstance>> {
        self.lock().get(site_identifier).cloned()
    }

    /// Number of registered sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no site is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Registered site identifiers, sorted.
    #[must_use]
    pub fn site_identifiers(&self) -> Vec<String> {
        let mut sites: Vec<String> = self.lock().keys().cloned().collect();
        sites.sort_unstable();
        sites
    }

    /// Detach and forget one site's instance.
    ///
    /// Returns the instance so callers still holding it can read its final
    /// state. A later `create_or_get` for the site mounts a fresh cart.
    pub fn teardown(&self, site_identifier: &str) -> Option<Arc<CartInstance>> {
        let removed = self.lock().remove(site_identifier);
        if let Some(instance) = &removed {
            instance.teardown();
            info!(site = %site_identifier, "Cart instance torn down");
        }
        removed
    }

    /// Detach and forget every instance.
    pub fn reset(&self) {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, instance) in &drained {
            instance.teardown();
        }
        info!(count = drained.len(), "Instance registry reset");
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<CartInstance>>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::page::MemoryPage;

    #[test]
    fn test_create_or_get_returns_same_instance() {
        let registry = InstanceRegistry::new();
        let page = Arc::new(MemoryPage::new());

        let first = registry.create_or_get(CartConfiguration::for_site("shop"), page.clone());
        first.add_item("Shirt", Decimal::from(150_000)).unwrap();

        let second = registry.create_or_get(CartConfiguration::for_site("shop"), page);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.total_item_count(), 1);
        assert_eq!(
            second.diagnostics(),
            vec![Diagnostic::DuplicateInstance {
                site: "shop".to_string()
            }]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_repeated_embedding_records_duplicate_once() {
        let registry = InstanceRegistry::new();
        let page = Arc::new(MemoryPage::new());

        let cart = registry.create_or_get(CartConfiguration::for_site("shop"), page.clone());
        for _ in 0..5 {
            registry.create_or_get(CartConfiguration::for_site("shop"), page.clone());
        }

        assert_eq!(
            cart.diagnostics(),
            vec![Diagnostic::DuplicateInstance {
                site: "shop".to_string()
            }]
        );
    }

    #[test]
    fn test_sites_are_independent() {
        let registry = InstanceRegistry::new();
        let page = Arc::new(MemoryPage::new());

        let a = registry.create_or_get(CartConfiguration::for_site("a"), page.clone());
        let b = registry.create_or_get(CartConfiguration::for_site("b"), page);
        a.add_item("Shirt", Decimal::ONE).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.total_item_count(), 0);
        assert_eq!(registry.site_identifiers(), vec!["a", "b"]);
    }

    #[test]
    fn test_get_does_not_create() {
        let registry = InstanceRegistry::new();
        assert!(registry.get("shop").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_teardown_detaches_and_forgets() {
        let registry = InstanceRegistry::new();
        let page = Arc::new(MemoryPage::new());
        registry.create_or_get(CartConfiguration::for_site("shop"), page.clone());
        assert!(page.is_attached("embed-cart-shop"));

        let removed = registry.teardown("shop").unwrap();
        assert_eq!(removed.site_identifier(), "shop");
        assert!(registry.get("shop").is_none());
        assert!(!page.is_attached("embed-cart-shop"));
        assert!(registry.teardown("shop").is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let registry = InstanceRegistry::new();
        let page = Arc::new(MemoryPage::new());
        registry.create_or_get(CartConfiguration::for_site("a"), page.clone());
        registry.create_or_get(CartConfiguration::for_site("b"), page.clone());

        registry.reset();
        assert!(registry.is_empty());
        assert!(!page.is_attached("embed-cart-a"));
        assert!(!page.is_attached("embed-cart-b"));
    }

    #[test]
    fn test_global_is_shared() {
        let page = Arc::new(MemoryPage::new());
        let site = "registry-unit-test-global";
        let first = InstanceRegistry::global().create_or_get(CartConfiguration::for_site(site), page);
        let found = InstanceRegistry::global().get(site).unwrap();
        assert!(Arc::ptr_eq(&first, &found));
        InstanceRegistry::global().teardown(site);
    }
}
