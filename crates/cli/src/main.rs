//! GoMarketplace CLI - cart inspection and mutation tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart contents and totals
//! gm-cli cart show
//!
//! # Add one unit of a product
//! gm-cli cart add --id battery-pack --title "Battery Pack" --price 49.90
//!
//! # Adjust quantities of items already in the cart
//! gm-cli cart increment battery-pack
//! gm-cli cart decrement battery-pack
//! ```
//!
//! The cart persists under the directory named by `GM_DATA_DIR` (default
//! `.gomarketplace`), so it carries over between invocations.
//!
//! # Commands
//!
//! - `cart show` - List line items, unit count, and subtotal
//! - `cart add` - Add one unit of a product
//! - `cart increment` / `cart decrement` - Adjust a line item's quantity

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or mutate the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product identifier
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Unit price (e.g., 49.90)
        #[arg(long)]
        price: Decimal,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Add one unit to an item already in the cart
    Increment {
        /// Product identifier
        id: String,
    },
    /// Remove one unit from an item in the cart
    Decrement {
        /// Product identifier
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter.
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gm_cli=info,go_marketplace_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                id,
                title,
                price,
                image_url,
            } => {
                commands::cart::add(&id, &title, price, &image_url).await?;
            }
            CartAction::Increment { id } => commands::cart::increment(&id).await?,
            CartAction::Decrement { id } => commands::cart::decrement(&id).await?,
        },
    }
    Ok(())
}
