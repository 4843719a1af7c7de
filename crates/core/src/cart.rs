//! Cart state for one site instance.
//!
//! [`CartStore`] owns the ordered list of line items and the four mutations
//! allowed on it. It knows nothing about rendering; the widget crate re-renders
//! from [`CartStore::snapshot`] after every mutation.
//!
//! # Invariants
//!
//! - Row ids are unique within a store.
//! - Product names are unique within a store (exact, case-sensitive match);
//!   adding a known name bumps its quantity in place.
//! - Every stored quantity is at least 1. A row whose quantity would drop to
//!   zero or below is removed instead.
//! - Rows keep insertion order.
//! - Totals are computed from the rows on every call, never cached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::LineItemId;

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable row token, used by the view to address this row.
    pub id: LineItemId,
    /// Product name; the de-duplication key.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Decimal,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// Price of all units on this row, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Price of all units on this row, or `None` if it overflows.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered line items of one cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
}

impl CartStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of the product called `name`.
    ///
    /// If a row with the same name exists its quantity is incremented and
    /// its `unit_price` is left untouched; otherwise a new row with a fresh
    /// id and quantity 1 is appended. Returns a copy of the affected row.
    pub fn add_item(&mut self, name: &str, unit_price: Decimal) -> LineItem {
        if let Some(item) = self.items.iter_mut().find(|item| item.name == name) {
            item.quantity = item.quantity.saturating_add(1);
            debug!(item_id = %item.id, quantity = item.quantity, "Incremented line item");
            return item.clone();
        }

        let item = LineItem {
            id: LineItemId::new(),
            name: name.to_owned(),
            unit_price,
            quantity: 1,
        };
        debug!(item_id = %item.id, name = %item.name, "Appended line item");
        self.items.push(item.clone());
        item
    }

    /// Delete the row with this id. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: LineItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            trace!(item_id = %id, "remove_item: no such row");
        } else {
            debug!(item_id = %id, "Removed line item");
        }
    }

    /// Add `delta` to the quantity of the row with this id.
    ///
    /// A result of zero or less removes the row. Unknown ids are ignored.
    /// Quantities saturate at `u32::MAX`.
    pub fn change_quantity(&mut self, id: LineItemId, delta: i64) {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            trace!(item_id = %id, "change_quantity: no such row");
            return;
        };

        let current = self.items.get(index).map_or(0, |item| i64::from(item.quantity));
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.items.remove(index);
            debug!(item_id = %id, "Quantity reached zero, removed line item");
            return;
        }

        if let Some(item) = self.items.get_mut(index) {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            debug!(item_id = %id, quantity = item.quantity, "Changed quantity");
        }
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        debug!(rows = self.items.len(), "Cleared cart");
        self.items.clear();
    }

    /// Copy of the current rows, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Look up one row by id.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` over all rows, saturating at the
    /// `Decimal` bounds.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
    }

    /// Exact sum of `unit_price * quantity`, or `None` if it overflows.
    #[must_use]
    pub fn checked_total_price(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.checked_line_total()?)
        })
    }

    /// The exact total after one more unit of `name`, or `None` if that
    /// total would overflow. An existing row keeps its own unit price.
    #[must_use]
    pub fn checked_total_after_add(&self, name: &str, unit_price: Decimal) -> Option<Decimal> {
        let added = self
            .items
            .iter()
            .find(|item| item.name == name)
            .map_or(unit_price, |item| item.unit_price);
        self.checked_total_price()?.checked_add(added)
    }

    /// Number of rows (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
