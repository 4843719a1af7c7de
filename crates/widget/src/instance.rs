//! One live cart: configuration, store and view for a single site.
//!
//! [`CartInstance`] is what host-page scripts hold on to. Every method takes
//! the instance lock once, so a mutation and the re-render that follows it
//! are never interleaved with another call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embed_cart_core::{CartStore, LineItem};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::config::CartConfiguration;
use crate::error::{Diagnostic, Result, WidgetError};
use crate::format::format_price;
use crate::page::Page;
use crate::view::{CartView, CheckoutOutcome, Gesture};

/// A mounted cart for one site identifier.
#[derive(Debug)]
pub struct CartInstance {
    config: Arc<CartConfiguration>,
    inner: Mutex<InstanceInner>,
}

#[derive(Debug)]
struct InstanceInner {
    store: CartStore,
    view: CartView,
    diagnostics: Vec<Diagnostic>,
}

impl CartInstance {
    /// Create an instance and mount its view on `page`.
    ///
    /// Mount problems are recorded as diagnostics; a failed render is logged.
    /// Neither prevents the instance from being created.
    #[must_use]
    pub fn mount(config: CartConfiguration, page: Arc<dyn Page>) -> Self {
        let config = Arc::new(config);
        let store = CartStore::new();
        let mut view = CartView::new(config.clone(), page);

        let diagnostics = view.mount(&store).unwrap_or_else(|e| {
            warn!(site = %config.site_identifier, "Failed to render cart: {e}");
            Vec::new()
        });

        Self {
            config,
            inner: Mutex::new(InstanceInner {
                store,
                view,
                diagnostics,
            }),
        }
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &CartConfiguration {
        &self.config
    }

    /// The site identifier this instance was registered under.
    #[must_use]
    pub fn site_identifier(&self) -> &str {
        &self.config.site_identifier
    }

    /// Add one unit of a product and refresh the view.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::InvalidItem` for a blank name, a negative price
    /// or a price that would overflow the cart total; the cart is left
    /// unchanged. Returns `WidgetError::Render` if
    /// the refresh fails after the item was added.
    #[instrument(skip(self), fields(site = %self.config.site_identifier))]
    pub fn add_item(&self, name: &str, unit_price: Decimal) -> Result<LineItem> {
        if name.trim().is_empty() {
            return Err(WidgetError::InvalidItem("name cannot be empty".to_string()));
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(WidgetError::InvalidItem(format!(
                "price cannot be negative (got {unit_price})"
            )));
        }

        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        if store.checked_total_after_add(name, unit_price).is_none() {
            return Err(WidgetError::InvalidItem(format!(
                "adding {name:?} would overflow the cart total"
            )));
        }
        let item = store.add_item(name, unit_price);
        view.sync(store)?;
        Ok(item)
    }

    /// Empty the cart and refresh the view.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if the refresh fails.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        store.clear();
        view.sync(store)
    }

    /// Copy of the current line items.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.lock().store.snapshot()
    }

    /// Current line items as JSON, for host scripts.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Serialize` if serialization fails.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Sum of `unit_price * quantity`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lock().store.total_price()
    }

    /// Total price formatted for the configured locale and currency.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_price(
            self.total_price(),
            &self.config.currency_code,
            &self.config.locale_tag,
        )
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lock().store.total_item_count()
    }

    /// Whether the popup is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().view.is_open()
    }

    /// Show the popup.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn open(&self) -> Result<()> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.open(store)
    }

    /// Hide the popup.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.close(store)
    }

    /// Flip popup visibility.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn toggle(&self) -> Result<()> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.toggle(store)
    }

    /// Run a simulated checkout.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn checkout(&self) -> Result<CheckoutOutcome> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.checkout(store)
    }

    /// Handle a visitor gesture.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn dispatch(&self, gesture: Gesture) -> Result<()> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.dispatch(store, gesture)
    }

    /// Add a sample product chosen with the caller's RNG.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if rendering fails.
    pub fn add_demo_item_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LineItem> {
        let mut inner = self.lock();
        let InstanceInner { store, view, .. } = &mut *inner;
        view.add_demo_item_with(store, rng)
    }

    /// Handle a click forwarded from rendered markup.
    ///
    /// # Errors
    ///
    /// Returns an error if the action cannot be parsed or rendering fails.
    pub fn dispatch_action(&self, action: &str, item_id: Option<&str>) -> Result<()> {
        self.dispatch(Gesture::from_action(action, item_id)?)
    }

    /// Diagnostics recorded for this instance so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().diagnostics.clone()
    }

    /// Record a diagnostic raised on this instance's behalf. A diagnostic
    /// equal to one already recorded is dropped.
    pub(crate) fn record(&self, diagnostic: Diagnostic) {
        let mut inner = self.lock();
        if !inner.diagnostics.contains(&diagnostic) {
            inner.diagnostics.push(diagnostic);
        }
    }

    /// Detach the view from the page. The cart contents are kept.
    pub fn teardown(&self) {
        self.lock().view.teardown();
    }

    fn lock(&self) -> MutexGuard<'_, InstanceInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, Notice, Slot};

    fn instance() -> (Arc<MemoryPage>, CartInstance) {
        let page = Arc::new(MemoryPage::new());
        let instance = CartInstance::mount(CartConfiguration::for_site("shop"), page.clone());
        (page, instance)
    }

    #[test]
    fn test_add_item_validates_input() {
        let (_, cart) = instance();
        assert!(matches!(
            cart.add_item("  ", Decimal::ONE),
            Err(WidgetError::InvalidItem(_))
        ));
        assert!(matches!(
            cart.add_item("Shirt", Decimal::from(-1)),
            Err(WidgetError::InvalidItem(_))
        ));
        assert!(cart.snapshot().is_empty());
        assert!(cart.add_item("Free gift", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_add_item_rejects_overflowing_total() {
        let (page, cart) = instance();
        cart.add_item("Yacht", Decimal::MAX).unwrap();

        assert!(matches!(
            cart.add_item("Yacht", Decimal::MAX),
            Err(WidgetError::InvalidItem(_))
        ));
        assert!(matches!(
            cart.add_item("Dinghy", Decimal::ONE),
            Err(WidgetError::InvalidItem(_))
        ));
        assert_eq!(cart.total_item_count(), 1);
        assert_eq!(cart.total_price(), Decimal::MAX);
        assert!(page.slot_html("embed-cart-shop", &Slot::Popup).is_some());
    }

    #[test]
    fn test_increase_past_decimal_range_does_not_panic() {
        let (_, cart) = instance();
        let item = cart.add_item("Yacht", Decimal::MAX).unwrap();
        cart.dispatch(Gesture::Increase(item.id)).unwrap();
        assert_eq!(cart.total_price(), Decimal::MAX);
        cart.checkout().unwrap();
        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_programmatic_surface() {
        let (page, cart) = instance();
        cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
        cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
        cart.add_item("Pants", Decimal::from(350_000)).unwrap();

        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total_price(), Decimal::from(650_000));
        assert_eq!(cart.formatted_total(), "650.000\u{a0}₫");

        let trigger = page.slot_html("embed-cart-shop", &Slot::Trigger).unwrap();
        assert!(trigger.contains(">3</span>"));

        cart.clear().unwrap();
        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let (_, cart) = instance();
        cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&cart.snapshot_json().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Shirt");
        assert_eq!(json[0]["quantity"], 1);
    }

    #[test]
    fn test_open_close() {
        let (_, cart) = instance();
        cart.open().unwrap();
        assert!(cart.is_open());
        cart.close().unwrap();
        assert!(!cart.is_open());
        cart.toggle().unwrap();
        assert!(cart.is_open());
    }

    #[test]
    fn test_dispatch_action_from_markup() {
        let (page, cart) = instance();
        let item = cart.add_item("Shirt", Decimal::ONE).unwrap();
        let id = item.id.to_string();

        cart.dispatch_action("decrease", Some(&id)).unwrap();
        assert!(cart.snapshot().is_empty());

        cart.dispatch_action("checkout", None).unwrap();
        assert_eq!(page.notices(), vec![Notice::EmptyCart]);

        assert!(cart.dispatch_action("teleport", None).is_err());
    }

    #[test]
    fn test_teardown_keeps_contents() {
        let (page, cart) = instance();
        cart.add_item("Shirt", Decimal::ONE).unwrap();
        cart.teardown();
        assert!(!page.is_attached("embed-cart-shop"));
        assert_eq!(cart.snapshot().len(), 1);
    }
}
