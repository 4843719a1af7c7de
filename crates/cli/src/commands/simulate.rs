//! `embed-cart simulate`: replay a visitor session from a script.
//!
//! # Script format
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.
//! Rows are addressed by their 1-based position in the cart at that moment.
//!
//! ```text
//! add 150000 Basic T-Shirt
//! add 350000 Slim Jeans
//! inc 1
//! dec 2
//! remove 1
//! demo
//! open | close | toggle
//! checkout
//! clear
//! snapshot
//! ```
//!
//! Notices are printed as `notice: ...` lines as they happen, `snapshot`
//! prints the cart as JSON, and the final cart is printed the same way when
//! the script ends.

use std::io::Write;

use embed_cart_core::{LineItem, LineItemId};
use embed_cart_widget::{CartInstance, Gesture, MemoryPage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::{CliError, mount, parse_price, write_diagnostics};
use crate::EmbedArgs;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Add { price: Decimal, name: String },
    Increase(usize),
    Decrease(usize),
    Remove(usize),
    Demo,
    Open,
    Close,
    Toggle,
    Checkout,
    Clear,
    Snapshot,
}

/// A parsed step with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// What `snapshot` prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartSummary {
    site: String,
    open: bool,
    item_count: u64,
    total: Decimal,
    formatted_total: String,
    items: Vec<LineItem>,
}

impl CartSummary {
    fn of(cart: &CartInstance) -> Self {
        Self {
            site: cart.site_identifier().to_string(),
            open: cart.is_open(),
            item_count: cart.total_item_count(),
            total: cart.total_price(),
            formatted_total: cart.formatted_total(),
            items: cart.snapshot(),
        }
    }
}

/// Parse a whole script. Nothing runs if any line is malformed.
///
/// # Errors
///
/// Returns `CliError::Script` for the first malformed line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, CliError> {
    source
        .lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(line, text)| {
            parse_step(text)
                .map(|step| ScriptLine { line, step })
                .map_err(|message| CliError::Script { line, message })
        })
        .collect()
}

fn parse_step(text: &str) -> Result<Step, String> {
    let (command, rest) = text
        .split_once(char::is_whitespace)
        .map_or((text, ""), |(command, rest)| (command, rest.trim()));

    let step = match command.to_ascii_lowercase().as_str() {
        "add" => {
            let (price, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: add <price> <name>".to_string())?;
            let price = parse_price(price).map_err(|e| e.to_string())?;
            Step::Add {
                price,
                name: name.trim().to_string(),
            }
        }
        "inc" => Step::Increase(parse_row(rest)?),
        "dec" => Step::Decrease(parse_row(rest)?),
        "remove" => Step::Remove(parse_row(rest)?),
        "demo" => Step::Demo,
        "open" => Step::Open,
        "close" => Step::Close,
        "toggle" => Step::Toggle,
        "checkout" => Step::Checkout,
        "clear" => Step::Clear,
        "snapshot" => Step::Snapshot,
        other => return Err(format!("unknown command {other:?}")),
    };

    let takes_argument = matches!(
        step,
        Step::Add { .. } | Step::Increase(_) | Step::Decrease(_) | Step::Remove(_)
    );
    if !takes_argument && !rest.is_empty() {
        return Err(format!("{command} takes no arguments"));
    }
    Ok(step)
}

fn parse_row(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row),
        _ => Err(format!("expected a row number starting at 1, got {raw:?}")),
    }
}

/// Run `source` against the site's cart and print what happens.
///
/// # Errors
///
/// Fails on a malformed script, a row that does not exist, a rejected item
/// or a write error. Steps before the failing one have already run.
pub fn run<W: Write>(
    source: &str,
    embed: &EmbedArgs,
    seed: Option<u64>,
    out: &mut W,
) -> Result<(), CliError> {
    let script = parse_script(source)?;
    let (page, cart) = mount(embed)?;
    let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    info!(site = %cart.site_identifier(), steps = script.len(), "Replaying session");
    write_diagnostics(&cart, out)?;

    for ScriptLine { line, step } in script {
        debug!(line, ?step, "Step");
        match step {
            Step::Add { price, name } => {
                cart.add_item(&name, price)?;
            }
            Step::Increase(row) => cart.dispatch(Gesture::Increase(row_id(&cart, row, line)?))?,
            Step::Decrease(row) => cart.dispatch(Gesture::Decrease(row_id(&cart, row, line)?))?,
            Step::Remove(row) => cart.dispatch(Gesture::Remove(row_id(&cart, row, line)?))?,
            Step::Demo => {
                cart.add_demo_item_with(&mut rng)?;
            }
            Step::Open => cart.open()?,
            Step::Close => cart.close()?,
            Step::Toggle => cart.toggle()?,
            Step::Checkout => {
                cart.checkout()?;
            }
            Step::Clear => cart.clear()?,
            Step::Snapshot => write_summary(&cart, out)?,
        }
        write_notices(&page, out)?;
    }

    write_summary(&cart, out)
}

fn row_id(cart: &CartInstance, row: usize, line: usize) -> Result<LineItemId, CliError> {
    let items = cart.snapshot();
    row.checked_sub(1)
        .and_then(|index| items.get(index))
        .map(|item| item.id)
        .ok_or_else(|| CliError::Script {
            line,
            message: format!("row {row} does not exist (cart has {} rows)", items.len()),
        })
}

fn write_notices<W: Write>(page: &MemoryPage, out: &mut W) -> Result<(), CliError> {
    for notice in page.take_notices() {
        writeln!(out, "notice: {notice}")?;
    }
    Ok(())
}

fn write_summary<W: Write>(cart: &CartInstance, out: &mut W) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, &CartSummary::of(cart))?;
    writeln!(out)?;
    Ok(())
}
