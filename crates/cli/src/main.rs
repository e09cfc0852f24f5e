//! Shoe Store CLI - catalog and order log tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! shoe-cli catalog
//! shoe-cli catalog --category running
//!
//! # List placed orders
//! shoe-cli orders list
//!
//! # Show one order as JSON
//! shoe-cli orders show ORD-1718035200123-3f2a9c1e
//!
//! # Read a different log
//! shoe-cli orders --log /var/lib/shoe-store/shoeOrders.json list
//! ```
//!
//! The order log defaults to `STOREFRONT_ORDER_LOG_PATH` (also read from
//! `.env`), falling back to `data/shoeOrders.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shoe_store_storefront::catalog::Catalog;
use shoe_store_storefront::config::DEFAULT_ORDER_LOG_PATH;
use shoe_store_storefront::db::JsonFileOrderLog;

mod commands;

#[derive(Parser)]
#[command(name = "shoe-cli")]
#[command(author, version, about = "Shoe Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Catalog {
        /// Only list products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Inspect placed orders
    Orders {
        /// Order log file
        #[arg(long, env = "STOREFRONT_ORDER_LOG_PATH", default_value = DEFAULT_ORDER_LOG_PATH)]
        log: PathBuf,

        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List every order in the log
    List,
    /// Print one order as JSON
    Show {
        /// Order identifier (e.g. ORD-1718035200123-3f2a9c1e)
        id: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Catalog { category } => {
            commands::catalog::list(&mut out, &Catalog::builtin(), category.as_deref())?;
        }
        Commands::Orders { log, action } => {
            tracing::debug!(path = %log.display(), "Opening order log");
            let log = JsonFileOrderLog::new(log);
            match action {
                OrdersAction::List => commands::orders::list(&mut out, &log)?,
                OrdersAction::Show { id } => commands::orders::show(&mut out, &log, &id)?,
            }
        }
    }

    out.flush()?;
    Ok(())
}
