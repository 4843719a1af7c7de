//! Embed Cart Core - Cart state and shared types.
//!
//! This crate provides the pieces of the embeddable cart widget that have no
//! rendering knowledge. It is shared by:
//! - `widget` - Configuration, price formatting, rendering and the instance registry
//! - `cli` - Command-line tools for rendering and replaying widget sessions
//!
//! # Architecture
//!
//! The core crate contains only types and the cart state machine - no I/O,
//! no templates, no host page access. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for line item ids, currency codes, locale tags and display options
//! - [`cart`] - The [`CartStore`] that owns the line items of one site

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartStore, LineItem};
pub use types::*;
