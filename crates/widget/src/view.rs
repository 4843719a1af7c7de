//! Cart presentation and gesture handling.
//!
//! [`CartView`] renders a [`CartStore`] snapshot into the widget's isolated
//! scope and turns visitor gestures into store mutations. Every gesture is
//! handled the same way: mutate the store, re-render the popup from the new
//! snapshot, refresh the trigger badge.
//!
//! Markup is produced by Askama templates fed with display structs whose
//! prices are already formatted, so templates contain no logic beyond
//! branching on the empty cart.

use std::fmt::Write as _;
use std::sync::Arc;

use askama::Template;
use embed_cart_core::{CartStore, LineItem, LineItemId, Position, Theme};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::config::CartConfiguration;
use crate::error::{Diagnostic, Result, WidgetError};
use crate::format::format_price;
use crate::page::{Notice, Page, Slot};

// =============================================================================
// Gestures
// =============================================================================

/// A visitor action on the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Click on the floating trigger.
    Toggle,
    /// Click on the compact mount-target trigger.
    Open,
    /// Click on the popup's close button.
    Close,
    /// Click on the backdrop outside the popup body.
    Backdrop,
    /// Click inside the popup body that hit no control. Does nothing; it
    /// keeps the click from reaching the backdrop.
    Ignore,
    /// One more unit of a row.
    Increase(LineItemId),
    /// One fewer unit of a row; removes the row at zero.
    Decrease(LineItemId),
    /// Drop a row.
    Remove(LineItemId),
    /// Add a random sample product.
    AddDemoItem,
    /// Simulated checkout.
    Checkout,
}

impl Gesture {
    /// Parse the `data-action` / `data-item-id` pair carried by rendered
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::UnknownAction` for unrecognised actions and
    /// `WidgetError::MissingItemId` when a row action has no parseable id.
    pub fn from_action(action: &str, item_id: Option<&str>) -> Result<Self> {
        let row = |make: fn(LineItemId) -> Self| {
            item_id
                .and_then(|raw| raw.parse::<LineItemId>().ok())
                .map(make)
                .ok_or_else(|| WidgetError::MissingItemId {
                    action: action.to_owned(),
                    item_id: item_id.map(str::to_owned),
                })
        };

        match action.trim() {
            "toggle" => Ok(Self::Toggle),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "backdrop" => Ok(Self::Backdrop),
            "none" => Ok(Self::Ignore),
            "increase" => row(Self::Increase),
            "decrease" => row(Self::Decrease),
            "remove" => row(Self::Remove),
            "add-demo" => Ok(Self::AddDemoItem),
            "checkout" => Ok(Self::Checkout),
            other => Err(WidgetError::UnknownAction(other.to_owned())),
        }
    }

    /// The `data-action` value for this gesture.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Open => "open",
            Self::Close => "close",
            Self::Backdrop => "backdrop",
            Self::Ignore => "none",
            Self::Increase(_) => "increase",
            Self::Decrease(_) => "decrease",
            Self::Remove(_) => "remove",
            Self::AddDemoItem => "add-demo",
            Self::Checkout => "checkout",
        }
    }
}

/// Popup visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    Open,
}

/// Result of a simulated checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to buy; the cart was left untouched.
    EmptyCart,
    /// The order was "placed" and the cart cleared.
    Completed { total: Decimal, item_count: u64 },
}

// =============================================================================
// Demo Products
// =============================================================================

/// A fixed sample product offered by the "add sample" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoProduct {
    pub name: &'static str,
    pub price: i64,
}

/// Sample catalogue, priced in whole dong.
pub const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Basic T-Shirt",
        price: 150_000,
    },
    DemoProduct {
        name: "Slim Jeans",
        price: 350_000,
    },
    DemoProduct {
        name: "Canvas Sneakers",
        price: 890_000,
    },
    DemoProduct {
        name: "Baseball Cap",
        price: 120_000,
    },
    DemoProduct {
        name: "Leather Wallet",
        price: 450_000,
    },
];

// =============================================================================
// Display Data
// =============================================================================

/// Line item display data for templates.
#[derive(Debug, Clone)]
pub struct LineItemDisplay {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartDisplay {
    pub items: Vec<LineItemDisplay>,
    pub total: String,
    pub item_count: u64,
}

impl CartDisplay {
    /// Build display data from the store's current snapshot.
    #[must_use]
    pub fn from_store(store: &CartStore, config: &CartConfiguration) -> Self {
        let price = |amount: Decimal| format_price(amount, &config.currency_code, &config.locale_tag);
        Self {
            items: store
                .snapshot()
                .iter()
                .map(|item| LineItemDisplay {
                    id: item.id.to_string(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: price(item.unit_price),
                    line_total: price(item.line_total()),
                })
                .collect(),
            total: price(store.total_price()),
            item_count: store.total_item_count(),
        }
    }
}

/// Theme colours injected into the scope's stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub accent_text: &'static str,
}

impl Palette {
    /// Colours for a theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: "#ffffff",
                surface: "#f4f5f7",
                text: "#1f2328",
                muted: "#6b7280",
                accent: "#2563eb",
                accent_text: "#ffffff",
            },
            Theme::Dark => Self {
                background: "#1e1f24",
                surface: "#2a2c33",
                text: "#f3f4f6",
                muted: "#9ca3af",
                accent: "#f59e0b",
                accent_text: "#111827",
            },
            Theme::Ocean => Self {
                background: "#f0f9ff",
                surface: "#e0f2fe",
                text: "#0c4a6e",
                muted: "#0369a1",
                accent: "#0891b2",
                accent_text: "#ffffff",
            },
            Theme::Sunset => Self {
                background: "#fff7ed",
                surface: "#ffedd5",
                text: "#431407",
                muted: "#9a3412",
                accent: "#ea580c",
                accent_text: "#ffffff",
            },
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Isolated scope: shadow host, shadow root, styles and slot placeholders.
#[derive(Template)]
#[template(path = "scope.html")]
struct ScopeTemplate<'a> {
    scope_id: &'a str,
    site_id: &'a str,
    theme: Theme,
    position: Position,
    vertical_edge: &'static str,
    horizontal_edge: &'static str,
    palette: Palette,
}

/// Floating trigger with count badge.
#[derive(Template)]
#[template(path = "partials/trigger.html")]
struct TriggerTemplate {
    count: u64,
}

/// Compact trigger rendered into the host's mount target.
#[derive(Template)]
#[template(path = "partials/mount_trigger.html")]
struct MountTriggerTemplate<'a> {
    site_id: &'a str,
    count: u64,
}

/// Popup with line items, totals and actions.
#[derive(Template)]
#[template(path = "partials/popup.html")]
struct PopupTemplate {
    open: bool,
    cart: CartDisplay,
}

// =============================================================================
// CartView
// =============================================================================

/// Renders one cart into its isolated scope and handles its gestures.
pub struct CartView {
    config: Arc<CartConfiguration>,
    page: Arc<dyn Page>,
    scope_id: String,
    popup: PopupState,
    mounted: bool,
    mounted_target: Option<String>,
}

impl std::fmt::Debug for CartView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartView")
            .field("scope_id", &self.scope_id)
            .field("popup", &self.popup)
            .field("mounted", &self.mounted)
            .field("mounted_target", &self.mounted_target)
            .finish_non_exhaustive()
    }
}

impl CartView {
    /// Create a view; nothing is attached until [`CartView::mount`].
    #[must_use]
    pub fn new(config: Arc<CartConfiguration>, page: Arc<dyn Page>) -> Self {
        let scope_id = scope_id_for(&config.site_identifier);
        Self {
            config,
            page,
            scope_id,
            popup: PopupState::Closed,
            mounted: false,
            mounted_target: None,
        }
    }

    /// Id of the scope's host element.
    #[must_use]
    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    /// Current popup visibility.
    #[must_use]
    pub const fn popup_state(&self) -> PopupState {
        self.popup
    }

    /// Whether the popup is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.popup == PopupState::Open
    }

    /// Host element the compact trigger was rendered into, if any.
    #[must_use]
    pub fn mounted_target(&self) -> Option<&str> {
        self.mounted_target.as_deref()
    }

    /// Attach the scope, the triggers and the (closed) popup to the page.
    ///
    /// A missing mount target is not an error: the compact trigger is
    /// skipped and a [`Diagnostic`] is returned.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    #[instrument(skip(self, store), fields(scope = %self.scope_id))]
    pub fn mount(&mut self, store: &CartStore) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();

        let position = self.config.position;
        let root = ScopeTemplate {
            scope_id: &self.scope_id,
            site_id: &self.config.site_identifier,
            theme: self.config.theme,
            position,
            vertical_edge: if position.is_top() { "top" } else { "bottom" },
            horizontal_edge: if position.is_left() { "left" } else { "right" },
            palette: Palette::for_theme(self.config.theme),
        }
        .render()?;
        self.page.attach(&self.scope_id, Slot::Root, root);
        self.mounted = true;

        if let Some(target) = self.config.mount_target_id.as_deref() {
            if self.page.element_exists(target) {
                self.mounted_target = Some(target.to_owned());
            } else {
                let diagnostic = Diagnostic::MountTargetMissing {
                    id: target.to_owned(),
                };
                tracing::warn!(scope = %self.scope_id, "{diagnostic}");
                diagnostics.push(diagnostic);
            }
        }

        self.refresh_trigger_badge(store)?;
        self.render(store)?;
        debug!("Mounted cart view");
        Ok(diagnostics)
    }

    /// Show the popup, re-rendered from the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn open(&mut self, store: &CartStore) -> Result<()> {
        self.popup = PopupState::Open;
        self.render(store)
    }

    /// Hide the popup.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn close(&mut self, store: &CartStore) -> Result<()> {
        self.popup = PopupState::Closed;
        self.render(store)
    }

    /// Flip popup visibility.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn toggle(&mut self, store: &CartStore) -> Result<()> {
        match self.popup {
            PopupState::Open => self.close(store),
            PopupState::Closed => self.open(store),
        }
    }

    /// Render the popup from the store's snapshot.
    ///
    /// The same snapshot always yields the same markup. An empty cart gets
    /// a dedicated empty-state block. Does nothing while unmounted.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if the template fails to render.
    pub fn render(&self, store: &CartStore) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        let html = PopupTemplate {
            open: self.is_open(),
            cart: CartDisplay::from_store(store, &self.config),
        }
        .render()?;
        self.page.attach(&self.scope_id, Slot::Popup, html);
        Ok(())
    }

    /// Update the count shown on the floating trigger and, if mounted, on the
    /// compact trigger. Independent of popup visibility.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn refresh_trigger_badge(&self, store: &CartStore) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        let count = store.total_item_count();

        if self.config.show_trigger {
            let html = TriggerTemplate { count }.render()?;
            self.page.attach(&self.scope_id, Slot::Trigger, html);
        }

        if let Some(target) = &self.mounted_target {
            let html = MountTriggerTemplate {
                site_id: &self.config.site_identifier,
                count,
            }
            .render()?;
            self.page
                .attach(&self.scope_id, Slot::MountTarget(target.clone()), html);
        }

        Ok(())
    }

    /// Handle one gesture: mutate, re-render, refresh the badge.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render. The store
    /// mutation has already been applied in that case.
    #[instrument(skip(self, store), fields(scope = %self.scope_id))]
    pub fn dispatch(&mut self, store: &mut CartStore, gesture: Gesture) -> Result<()> {
        match gesture {
            Gesture::Toggle => return self.toggle(store),
            Gesture::Open => return self.open(store),
            Gesture::Close | Gesture::Backdrop => return self.close(store),
            Gesture::Ignore => return Ok(()),
            Gesture::Checkout => return self.checkout(store).map(|_| ()),
            Gesture::AddDemoItem => {
                self.add_demo_item(store)?;
                return Ok(());
            }
            Gesture::Increase(id) => store.change_quantity(id, 1),
            Gesture::Decrease(id) => store.change_quantity(id, -1),
            Gesture::Remove(id) => store.remove_item(id),
        }
        self.sync(store)
    }

    /// Add a random sample product.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn add_demo_item(&mut self, store: &mut CartStore) -> Result<LineItem> {
        self.add_demo_item_with(store, &mut rand::rng())
    }

    /// Add a sample product chosen with the caller's RNG.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn add_demo_item_with<R: Rng + ?Sized>(
        &mut self,
        store: &mut CartStore,
        rng: &mut R,
    ) -> Result<LineItem> {
        let product = DEMO_PRODUCTS.choose(rng).copied().unwrap_or(DemoProduct {
            name: "Sample",
            price: 0,
        });
        let item = store.add_item(product.name, Decimal::from(product.price));
        self.sync(store)?;
        Ok(item)
    }

    /// Simulated checkout.
    ///
    /// An empty cart gets a notice and no state change. Otherwise the total
    /// is announced, the cart cleared and the view re-rendered.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    #[instrument(skip(self, store), fields(scope = %self.scope_id))]
    pub fn checkout(&mut self, store: &mut CartStore) -> Result<CheckoutOutcome> {
        if store.is_empty() {
            self.page.notify(&Notice::EmptyCart);
            return Ok(CheckoutOutcome::EmptyCart);
        }

        let total = store.total_price();
        let item_count = store.total_item_count();
        let formatted = format_price(total, &self.config.currency_code, &self.config.locale_tag);
        info!(%total, item_count, "Checkout completed");

        self.page.notify(&Notice::OrderPlaced { total: formatted });
        store.clear();
        self.sync(store)?;

        Ok(CheckoutOutcome::Completed { total, item_count })
    }

    /// Re-render after a store mutation that did not come through a gesture.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::Render` if a template fails to render.
    pub fn sync(&self, store: &CartStore) -> Result<()> {
        self.render(store)?;
        self.refresh_trigger_badge(store)
    }

    /// Remove everything this view attached to the page.
    pub fn teardown(&mut self) {
        self.page.detach(&self.scope_id);
        self.mounted = false;
        self.popup = PopupState::Closed;
        self.mounted_target = None;
        debug!(scope = %self.scope_id, "Detached cart view");
    }
}

/// Host element id for a site's scope.
///
/// ASCII letters, digits and `-` are kept; every other byte, `_` included,
/// becomes `_` plus two hex digits. Distinct identifiers therefore never
/// share a scope.
#[must_use]
pub fn scope_id_for(site_identifier: &str) -> String {
    let mut id = String::from("embed-cart-");
    for byte in site_identifier.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            id.push(char::from(byte));
        } else {
            let _ = write!(id, "_{byte:02x}");
        }
    }
    id
}
