//! The host page the widget renders into.
//!
//! The widget never touches a document directly. It hands markup for
//! well-known [`Slot`]s to a [`Page`], which owns the actual encapsulation
//! primitive (a shadow root in browsers) and the blocking notice dialog.
//! [`MemoryPage`] records everything in memory and backs the CLI and tests.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A region of the widget's markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The isolated scope itself: shadow host, shadow root and styles.
    Root,
    /// The floating trigger button, inside the scope.
    Trigger,
    /// The popup with the line items, inside the scope.
    Popup,
    /// The compact trigger rendered into a host element with this id.
    MountTarget(String),
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Trigger => f.write_str("trigger"),
            Self::Popup => f.write_str("popup"),
            Self::MountTarget(id) => write!(f, "mount-target#{id}"),
        }
    }
}

/// A blocking, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Checkout was attempted with nothing in the cart.
    EmptyCart,
    /// Simulated checkout succeeded.
    OrderPlaced {
        /// Formatted order total.
        total: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCart => f.write_str("Your cart is empty."),
            Self::OrderPlaced { total } => {
                write!(f, "Thank you for your order! Total: {total}")
            }
        }
    }
}

/// Host page operations the widget relies on.
///
/// Implementations must keep `attach` idempotent: attaching to a slot
/// replaces whatever the slot held before.
pub trait Page: Send + Sync {
    /// Whether the host document has an element with this id.
    fn element_exists(&self, id: &str) -> bool;

    /// Replace the contents of `slot` in the scope named `scope`.
    fn attach(&self, scope: &str, slot: Slot, html: String);

    /// Remove every slot of `scope` from the document.
    fn detach(&self, scope: &str);

    /// Show a blocking notice to the visitor.
    fn notify(&self, notice: &Notice);
}

/// In-memory [`Page`] that records attached markup and notices.
#[derive(Debug, Default)]
pub struct MemoryPage {
    element_ids: HashSet<String>,
    state: Mutex<MemoryPageState>,
}

#[derive(Debug, Default)]
struct MemoryPageState {
    scopes: BTreeMap<String, BTreeMap<Slot, String>>,
    notices: Vec<Notice>,
}

impl MemoryPage {
    /// A page with no host elements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page whose document contains elements with these ids.
    #[must_use]
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element_ids: ids.into_iter().map(Into::into).collect(),
            state: Mutex::default(),
        }
    }

    /// Markup currently attached to `slot` of `scope`.
    #[must_use]
    pub fn slot_html(&self, scope: &str, slot: &Slot) -> Option<String> {
        self.lock().scopes.get(scope).and_then(|slots| slots.get(slot)).cloned()
    }

    /// All slots currently attached for `scope`, in slot order.
    #[must_use]
    pub fn slots(&self, scope: &str) -> Vec<(Slot, String)> {
        self.lock()
            .scopes
            .get(scope)
            .map(|slots| slots.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Whether anything is attached for `scope`.
    #[must_use]
    pub fn is_attached(&self, scope: &str) -> bool {
        self.lock().scopes.contains_key(scope)
    }

    /// Notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Drain the recorded notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryPageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn element_exists(&self, id: &str) -> bool {
        self.element_ids.contains(id)
    }

    fn attach(&self, scope: &str, slot: Slot, html: String) {
        self.lock()
            .scopes
            .entry(scope.to_owned())
            .or_default()
            .insert(slot, html);
    }

    fn detach(&self, scope: &str) {
        self.lock().scopes.remove(scope);
    }

    fn notify(&self, notice: &Notice) {
        tracing::info!(%notice, "Notice");
        self.lock().notices.push(notice.clone());
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_replaces_slot() {
        let page = MemoryPage::new();
        page.attach("s", Slot::Popup, "one".to_string());
        page.attach("s", Slot::Popup, "two".to_string());
        assert_eq!(page.slot_html("s", &Slot::Popup).as_deref(), Some("two"));
        assert_eq!(page.slots("s").len(), 1);
    }

    #[test]
    fn test_detach_removes_scope_only() {
        let page = MemoryPage::new();
        page.attach("a", Slot::Root, "a".to_string());
        page.attach("b", Slot::Root, "b".to_string());
        page.detach("a");
        assert!(!page.is_attached("a"));
        assert!(page.is_attached("b"));
    }

    #[test]
    fn test_element_exists() {
        let page = MemoryPage::with_elements(["cart-slot"]);
        assert!(page.element_exists("cart-slot"));
        assert!(!page.element_exists("missing"));
    }

    #[test]
    fn test_notices_are_recorded_in_order() {
        let page = MemoryPage::new();
        page.notify(&Notice::EmptyCart);
        page.notify(&Notice::OrderPlaced {
            total: "1 ₫".to_string(),
        });
        assert_eq!(page.notices().len(), 2);
        assert_eq!(page.take_notices()[0], Notice::EmptyCart);
        assert!(page.notices().is_empty());
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::EmptyCart.to_string(), "Your cart is empty.");
        assert!(
            Notice::OrderPlaced {
                total: "650.000 ₫".to_string()
            }
            .to_string()
            .contains("650.000 ₫")
        );
    }
}
