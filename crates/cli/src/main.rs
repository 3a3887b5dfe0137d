//! Mithai Stickers CLI - browse the catalog, check out, and review history.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, or one category
//! mithai catalog
//! mithai catalog --category milk-based
//!
//! # Search by item or category name
//! mithai search laddoo
//!
//! # Send two Jalebi and a Kaju Katli, paying by UPI
//! mithai checkout --item jalebi:2 --item kaju-katli \
//!     --receiver Meera --phone 9876543210 --upi meera@okaxis
//!
//! # Sent history, newest first
//! mithai history --type sent --limit 5
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default filter); results go
//! to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use mithai_storefront::history::HistoryKind;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use error::CliError;

const DEFAULT_LOG_FILTER: &str = "mithai_storefront=info,mithai_cli=info";

#[derive(Parser)]
#[command(name = "mithai")]
#[command(author, version, about = "Mithai Stickers storefront")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items grouped by category
    Catalog {
        /// Only this category (e.g. `milk-based`)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the trending items shown on the landing page
    Trending,
    /// Search items by item or category name
    Search {
        /// Case-insensitive substring
        query: String,
    },
    /// Show send/receive history
    History {
        /// `sent`, `received` or `all`
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: HistoryKind,

        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Entries to skip
        #[arg(short, long)]
        offset: Option<usize>,
    },
    /// Show per-item sent/received totals
    Collection,
    /// Buy stickers and send them to someone
    Checkout(CheckoutArgs),
}

/// Arguments for `mithai checkout`.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Item to buy as `id` or `id:quantity`; repeatable
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Your name
    #[arg(long)]
    pub sender: Option<String>,

    /// Receiver's name
    #[arg(long)]
    pub receiver: Option<String>,

    /// Receiver's 10-digit WhatsApp number
    #[arg(long)]
    pub phone: Option<String>,

    /// Receiver's email
    #[arg(long)]
    pub email: Option<String>,

    /// Gift message (up to 200 characters)
    #[arg(long)]
    pub message: Option<String>,

    /// Card number
    #[arg(long, conflicts_with = "upi")]
    pub card_number: Option<String>,

    /// Name on card
    #[arg(long, conflicts_with = "upi")]
    pub card_name: Option<String>,

    /// Card expiry as MM/YY
    #[arg(long, conflicts_with = "upi")]
    pub expiry: Option<String>,

    /// Card CVV
    #[arg(long, conflicts_with = "upi")]
    pub cvv: Option<String>,

    /// Pay with this UPI id instead of a card
    #[arg(long)]
    pub upi: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut store = commands::open_store()?;
    match cli.command {
        Commands::Catalog { category } => commands::browse::catalog(&store, category.as_deref())?,
        Commands::Trending => commands::browse::trending(&store)?,
        Commands::Search { query } => commands::browse::search(&mut store, query)?,
        Commands::History {
            kind,
            limit,
            offset,
        } => commands::history::history(&store, kind, limit, offset)?,
        Commands::Collection => commands::history::collection(&store)?,
        Commands::Checkout(args) => commands::checkout::checkout(&mut store, args).await?,
    }
    Ok(())
}
