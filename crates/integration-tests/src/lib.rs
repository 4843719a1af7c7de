//! Integration tests for the embeddable cart widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p embed-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Visitor sessions driven through the instance surface
//! - `embedding` - Attribute resolution, mount targets and the registry
//!
//! Tests that touch [`InstanceRegistry::global`] use a site identifier
//! unique to the test, since the test harness runs them concurrently.

use std::sync::Arc;

use embed_cart_widget::{CartConfiguration, CartInstance, EmbedAttributes, InstanceRegistry, MemoryPage};

/// A host page together with the cart mounted on it.
pub struct Harness {
    pub page: Arc<MemoryPage>,
    pub cart: Arc<CartInstance>,
}

impl Harness {
    /// Mount a cart from embedding attributes on a page containing `elements`.
    #[must_use]
    pub fn embed(registry: &InstanceRegistry, attrs: &[(&str, &str)], elements: &[&str]) -> Self {
        let config = CartConfiguration::from_attributes(&EmbedAttributes::from_pairs(
            attrs.iter().copied(),
        ));
        let page = Arc::new(MemoryPage::with_elements(elements.iter().copied()));
        let cart = registry.create_or_get(config, page.clone());
        Self { page, cart }
    }

    /// Markup in one slot of this cart's scope.
    #[must_use]
    pub fn slot(&self, slot: &embed_cart_widget::Slot) -> Option<String> {
        self.page.slot_html(&self.scope(), slot)
    }

    /// Scope id this cart renders into.
    #[must_use]
    pub fn scope(&self) -> String {
        embed_cart_widget::view::scope_id_for(self.cart.site_identifier())
    }
}
