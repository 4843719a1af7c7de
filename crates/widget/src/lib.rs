//! Embed Cart Widget - the embeddable cart as a library.
//!
//! A host page embeds the widget with a script tag; the script's attributes
//! become a [`CartConfiguration`], the [`InstanceRegistry`] hands out one
//! [`CartInstance`] per site identifier, and each instance renders its cart
//! into an isolated scope on the host [`Page`].
//!
//! # Architecture
//!
//! - Cart state lives in `embed_cart_core::CartStore` and knows nothing about markup
//! - [`CartView`] renders snapshots with Askama templates and maps gestures to store calls
//! - [`Page`] is the only way out to the host document; [`MemoryPage`] implements it in memory
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use embed_cart_widget::{CartConfiguration, EmbedAttributes, InstanceRegistry, MemoryPage};
//! use rust_decimal::Decimal;
//!
//! let attrs = EmbedAttributes::from_pairs([("data-site-id", "doc-example")]);
//! let config = CartConfiguration::from_attributes(&attrs);
//! let registry = InstanceRegistry::new();
//! let cart = registry.create_or_get(config, Arc::new(MemoryPage::new()));
//!
//! cart.add_item("Shirt", Decimal::from(150_000)).unwrap();
//! assert_eq!(cart.total_item_count(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod format;
pub mod instance;
pub mod page;
pub mod registry;
pub mod view;

pub use config::{CartConfiguration, ConfigError, EmbedAttributes};
pub use error::{Diagnostic, WidgetError};
pub use format::{FormatError, format_price};
pub use instance::CartInstance;
pub use page::{MemoryPage, Notice, Page, Slot};
pub use registry::InstanceRegistry;
pub use view::{CartView, CheckoutOutcome, Gesture, PopupState};
