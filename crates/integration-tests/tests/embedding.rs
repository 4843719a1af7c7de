//! Embedding attributes, mount targets and the instance registry.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use embed_cart_core::{Position, Theme};
use embed_cart_integration_tests::Harness;
use embed_cart_widget::view::scope_id_for;
use embed_cart_widget::{CartConfiguration, Diagnostic, InstanceRegistry, MemoryPage, Slot};
use rust_decimal::Decimal;

// =============================================================================
// Attributes
// =============================================================================

#[test]
fn test_attributes_shape_the_scope() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(
        &registry,
        &[
            ("data-site-id", "shop"),
            ("data-theme", "dark"),
            ("data-position", "top-left"),
            ("data-currency", "usd"),
            ("data-locale", "en-US"),
        ],
        &[],
    );

    let config = h.cart.config();
    assert_eq!(config.theme, Theme::Dark);
    assert_eq!(config.position, Position::TopLeft);

    let root = h.slot(&Slot::Root).unwrap();
    assert!(root.contains("shadowrootmode=\"open\""));
    assert!(root.contains("top: 24px"));
    assert!(root.contains("left: 24px"));

    h.cart.add_item("Cap", Decimal::new(1250, 2)).unwrap();
    assert_eq!(h.cart.formatted_total(), "$12.50");
}

#[test]
fn test_invalid_attributes_fall_back_to_defaults() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(
        &registry,
        &[
            ("data-site-id", "shop"),
            ("data-theme", "neon"),
            ("data-position", "center"),
        ],
        &[],
    );

    let config = h.cart.config();
    assert_eq!(config.theme, Theme::Light);
    assert_eq!(config.position, Position::BottomRight);
    assert!(h.slot(&Slot::Trigger).is_some());
}

#[test]
fn test_hidden_trigger() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(
        &registry,
        &[("data-site-id", "shop"), ("data-show-trigger", "false")],
        &[],
    );
    assert!(h.slot(&Slot::Trigger).is_none());
    assert!(h.slot(&Slot::Popup).is_some());
}

// =============================================================================
// Mount Targets
// =============================================================================

#[test]
fn test_mount_target_gets_compact_trigger() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(
        &registry,
        &[("data-site-id", "shop"), ("data-mount-target", "header-cart")],
        &["header-cart"],
    );
    let target = Slot::MountTarget("header-cart".to_string());

    h.cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
    let compact = h.slot(&target).unwrap();
    assert!(compact.contains("data-action=\"open\""));
    assert!(compact.contains(">1</span>"));
    assert!(h.slot(&Slot::Trigger).is_some());

    h.cart.dispatch_action("open", None).unwrap();
    assert!(h.cart.is_open());
    assert!(h.cart.diagnostics().is_empty());
}

#[test]
fn test_missing_mount_target_is_diagnosed() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(
        &registry,
        &[("data-site-id", "shop"), ("data-mount-target", "nowhere")],
        &[],
    );

    assert_eq!(
        h.cart.diagnostics(),
        vec![Diagnostic::MountTargetMissing {
            id: "nowhere".to_string()
        }]
    );
    assert!(h.slot(&Slot::MountTarget("nowhere".to_string())).is_none());

    h.cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
    assert!(h.slot(&Slot::Trigger).unwrap().contains(">1</span>"));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_snippet_included_twice() {
    let registry = InstanceRegistry::new();
    let first = Harness::embed(&registry, &[("data-site-id", "shop")], &[]);
    first.cart.add_item("Shirt", Decimal::from(150_000)).unwrap();

    let second = Harness::embed(&registry, &[("data-site-id", "shop"), ("data-theme", "dark")], &[]);

    assert!(Arc::ptr_eq(&first.cart, &second.cart));
    assert_eq!(second.cart.total_item_count(), 1);
    assert_eq!(second.cart.config().theme, Theme::Light);
    assert_eq!(
        second.cart.diagnostics(),
        vec![Diagnostic::DuplicateInstance {
            site: "shop".to_string()
        }]
    );
    assert!(!second.page.is_attached(&second.scope()));
}

#[test]
fn test_sites_render_into_separate_scopes() {
    let registry = InstanceRegistry::new();
    let a = Harness::embed(&registry, &[("data-site-id", "store-a")], &[]);
    let b = Harness::embed(&registry, &[("data-site-id", "store-b")], &[]);

    a.cart.add_item("Shirt", Decimal::from(150_000)).unwrap();

    assert_ne!(a.scope(), b.scope());
    assert_eq!(b.cart.total_item_count(), 0);
    assert_eq!(registry.site_identifiers(), vec!["store-a", "store-b"]);
}

#[test]
fn test_punctuation_variants_get_separate_scopes() {
    let registry = InstanceRegistry::new();
    let page = Arc::new(MemoryPage::new());
    let spaced = registry.create_or_get(CartConfiguration::for_site("shop a"), page.clone());
    let dashed = registry.create_or_get(CartConfiguration::for_site("shop-a"), page.clone());

    spaced.add_item("Shirt", Decimal::from(150_000)).unwrap();

    let spaced_scope = scope_id_for("shop a");
    let dashed_scope = scope_id_for("shop-a");
    assert_ne!(spaced_scope, dashed_scope);
    assert!(
        page.slot_html(&spaced_scope, &Slot::Trigger)
            .unwrap()
            .contains(">1</span>")
    );
    assert!(
        page.slot_html(&dashed_scope, &Slot::Trigger)
            .unwrap()
            .contains(">0</span>")
    );
    assert_eq!(dashed.total_item_count(), 0);

    registry.teardown("shop-a");
    assert!(page.is_attached(&spaced_scope));
    assert!(!page.is_attached(&dashed_scope));
}

#[test]
fn test_missing_site_id_uses_default() {
    let registry = InstanceRegistry::new();
    let h = Harness::embed(&registry, &[], &[]);
    assert_eq!(h.cart.site_identifier(), "default");
    assert!(registry.get("default").is_some());
}

#[test]
fn test_teardown_then_remount() {
    let registry = InstanceRegistry::new();
    let first = Harness::embed(&registry, &[("data-site-id", "shop")], &[]);
    first.cart.add_item("Shirt", Decimal::from(150_000)).unwrap();

    registry.teardown("shop").unwrap();
    assert!(!first.page.is_attached(&first.scope()));

    let second = Harness::embed(&registry, &[("data-site-id", "shop")], &[]);
    assert!(!Arc::ptr_eq(&first.cart, &second.cart));
    assert_eq!(second.cart.total_item_count(), 0);
}

#[test]
fn test_global_registry_shares_instances() {
    let site = "integration-global-shared";
    let first = Harness::embed(InstanceRegistry::global(), &[("data-site-id", site)], &[]);
    let second = Harness::embed(InstanceRegistry::global(), &[("data-site-id", site)], &[]);

    assert!(Arc::ptr_eq(&first.cart, &second.cart));
    assert!(InstanceRegistry::global().teardown(site).is_some());
    assert!(InstanceRegistry::global().get(site).is_none());
}
