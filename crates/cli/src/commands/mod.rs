//! Command implementations and the plumbing they share.

use std::io::Write;
use std::sync::Arc;

use embed_cart_widget::{
    CartConfiguration, CartInstance, ConfigError, EmbedAttributes, InstanceRegistry, MemoryPage,
    WidgetError,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::EmbedArgs;

pub mod render;
pub mod simulate;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turn `--attr key=value` flags into embedding attributes.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a flag without `=` and
/// `CliError::Config` for an attribute name the widget does not know.
pub fn attributes_from_flags(flags: &[String]) -> Result<EmbedAttributes, CliError> {
    let mut attrs = EmbedAttributes::default();
    for flag in flags {
        let (key, value) = flag
            .split_once('=')
            .ok_or_else(|| CliError::InvalidArgument(format!("expected KEY=VALUE, got {flag:?}")))?;
        attrs.set(key, value.trim())?;
    }
    Ok(attrs)
}

/// Resolve the configuration: environment first, flags on top.
///
/// # Errors
///
/// Fails on malformed flags, or on invalid values when `--strict` is set.
pub fn resolve_config(embed: &EmbedArgs) -> Result<CartConfiguration, CliError> {
    let attrs = EmbedAttributes::from_env().merged_with(attributes_from_flags(&embed.attrs)?);
    configure(&attrs, embed.strict)
}

fn configure(attrs: &EmbedAttributes, strict: bool) -> Result<CartConfiguration, CliError> {
    if strict {
        Ok(CartConfiguration::try_from_attributes(attrs)?)
    } else {
        Ok(CartConfiguration::from_attributes(attrs))
    }
}

/// Mount the site's cart on a fresh in-memory page.
///
/// # Errors
///
/// Fails if the configuration cannot be resolved.
pub fn mount(embed: &EmbedArgs) -> Result<(Arc<MemoryPage>, Arc<CartInstance>), CliError> {
    let config = resolve_config(embed)?;
    let page = Arc::new(MemoryPage::with_elements(embed.elements.iter().cloned()));
    let cart = InstanceRegistry::global().create_or_get(config, page.clone());
    Ok((page, cart))
}

/// Parse a price argument.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if `raw` is not a decimal number.
pub fn parse_price(raw: &str) -> Result<Decimal, CliError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| CliError::InvalidArgument(format!("invalid price {raw:?}: {e}")))
}

/// Print the diagnostics recorded on `cart` as HTML comments.
///
/// # Errors
///
/// Returns `CliError::Io` if writing fails.
pub fn write_diagnostics<W: Write>(cart: &CartInstance, out: &mut W) -> Result<(), CliError> {
    for diagnostic in cart.diagnostics() {
        writeln!(out, "<!-- diagnostic: {diagnostic} -->")?;
    }
    Ok(())
}
