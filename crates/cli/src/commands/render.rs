//! `embed-cart render`: print the fragments a host page would receive.
//!
//! Each attached slot is printed after a `<!-- slot: NAME -->` marker, in
//! slot order (root, trigger, popup, mount targets).

use std::io::Write;

use embed_cart_widget::MemoryPage;
use embed_cart_widget::view::scope_id_for;
use rust_decimal::Decimal;
use tracing::info;

use super::{CliError, mount, parse_price, write_diagnostics};
use crate::EmbedArgs;

/// Mount the cart, add `items`, optionally open it, and print the markup.
///
/// # Errors
///
/// Fails on bad arguments, rejected items or write errors.
pub fn run<W: Write>(
    embed: &EmbedArgs,
    items: &[String],
    open: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let parsed = items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let (page, cart) = mount(embed)?;
    for (name, price) in &parsed {
        cart.add_item(name, *price)?;
    }
    if open {
        cart.open()?;
    }

    info!(
        site = %cart.site_identifier(),
        items = cart.total_item_count(),
        "Rendering cart"
    );

    write_diagnostics(&cart, out)?;
    write_fragments(&page, &scope_id_for(cart.site_identifier()), out)
}

/// Split `name=price` on the last `=`, so names may contain `=`.
fn parse_item(raw: &str) -> Result<(String, Decimal), CliError> {
    let (name, price) = raw
        .rsplit_once('=')
        .ok_or_else(|| CliError::InvalidArgument(format!("expected NAME=PRICE, got {raw:?}")))?;
    Ok((name.trim().to_string(), parse_price(price)?))
}

fn write_fragments<W: Write>(page: &MemoryPage, scope: &str, out: &mut W) -> Result<(), CliError> {
    for (slot, html) in page.slots(scope) {
        writeln!(out, "<!-- slot: {slot} -->")?;
        writeln!(out, "{html}")?;
    }
    Ok(())
}
