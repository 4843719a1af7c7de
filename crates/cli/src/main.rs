//! Embed Cart CLI - render and exercise the cart widget from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Render the fragments a host page would receive
//! embed-cart render --attr site-id=shop --attr theme=dark --item "T-Shirt=150000" --open
//!
//! # Replay a scripted visitor session
//! embed-cart simulate session.txt --attr site-id=shop --seed 7
//! ```
//!
//! # Commands
//!
//! - `render` - Mount a cart and print every attached fragment
//! - `simulate` - Replay a line-oriented session and print the final cart
//!
//! Attributes are read from `EMBED_CART_*` environment variables (and `.env`)
//! first; `--attr` flags override them. Logs go to stderr and are filtered
//! with `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "embed-cart")]
#[command(author, version, about = "Embeddable cart widget tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a cart on an in-memory page and print its fragments
    Render {
        #[command(flatten)]
        embed: EmbedArgs,

        /// Line item to add before rendering (`name=price`), repeatable
        #[arg(short, long = "item", value_name = "NAME=PRICE")]
        items: Vec<String>,

        /// Render with the popup open
        #[arg(long)]
        open: bool,
    },
    /// Replay a scripted session against a cart
    Simulate {
        /// Session script, one command per line
        script: PathBuf,

        #[command(flatten)]
        embed: EmbedArgs,

        /// Seed for the demo product picker
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Options shared by every command that mounts a cart.
#[derive(Args, Debug, Default)]
pub struct EmbedArgs {
    /// Embedding attribute (`key=value`, `data-` prefix optional), repeatable
    #[arg(short, long = "attr", value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,

    /// Id of an element present on the host page, repeatable
    #[arg(short, long = "element", value_name = "ID")]
    pub elements: Vec<String>,

    /// Reject invalid attribute values instead of falling back to defaults
    #[arg(long)]
    pub strict: bool,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("embed_cart_widget=info,embed_cart_cli=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Render { embed, items, open } => {
            commands::render::run(&embed, &items, open, &mut stdout)?;
        }
        Commands::Simulate {
            script,
            embed,
            seed,
        } => {
            let source = std::fs::read_to_string(&script)?;
            commands::simulate::run(&source, &embed, seed, &mut stdout)?;
        }
    }
    Ok(())
}
