//! Velvet Mango CLI - Cart inspection and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Report the persisted cart
//! vm-cli show
//!
//! # Add one unit of an item
//! vm-cli add --id sku-1 --name "Mango Crate" --price 24.00 --final-price 19.99 --store-id s1
//!
//! # Remove an item entirely, regardless of its quantity
//! vm-cli remove --id sku-1 --store-id s1
//!
//! # Set an item's quantity (0 removes the item)
//! vm-cli set-quantity --id sku-1 --quantity 3 --store-id s1
//!
//! # Empty the cart
//! vm-cli clear
//! ```
//!
//! # Commands
//!
//! - `show` - Report totals, per-store summaries, and line items
//! - `add` / `remove` / `set-quantity` / `clear` - Mutate the persisted cart
//!
//! The cart snapshot lives under `VELVET_MANGO_DATA_DIR` (default: `./data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use velvet_mango_cart::CartItem;
use velvet_mango_core::{ItemId, Price, StoreId};

mod commands;

#[derive(Parser)]
#[command(name = "vm-cli")]
#[command(author, version, about = "Velvet Mango cart management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the cart: totals, per-store summaries, line items
    Show,
    /// Add one unit of an item to the cart
    Add {
        /// Item identifier, unique within its store grouping
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Pre-discount unit price (e.g. 24.00)
        #[arg(long)]
        price: Price,

        /// Effective unit price after discount
        #[arg(long)]
        final_price: Price,

        /// Owning seller; items without one fall into the default grouping
        #[arg(long)]
        store_id: Option<String>,

        /// Seller display name
        #[arg(long, requires = "store_id")]
        store_name: Option<String>,

        /// Seller logo URL
        #[arg(long, requires = "store_id")]
        store_logo: Option<String>,

        /// Mark the item as discounted
        #[arg(long)]
        on_sale: bool,

        /// Discount against the list price, as a percentage (e.g. 15)
        #[arg(long, default_value_t = 0.0)]
        discount: f64,

        /// Item image URL
        #[arg(long)]
        image: Option<String>,

        /// Item description
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an item from the cart entirely, regardless of its quantity
    Remove {
        /// Item identifier
        #[arg(long)]
        id: String,

        /// Seller grouping to remove from (default grouping when omitted)
        #[arg(long)]
        store_id: Option<String>,
    },
    /// Set an item's quantity (0 removes the item)
    SetQuantity {
        /// Item identifier
        #[arg(long)]
        id: String,

        /// New quantity; negative values are rejected
        #[arg(long, allow_hyphen_values = true)]
        quantity: i64,

        /// Seller grouping to update (default grouping when omitted)
        #[arg(long)]
        store_id: Option<String>,
    },
    /// Empty the cart
    Clear,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show => commands::cart::show(),
        Commands::Add {
            id,
            name,
            price,
            final_price,
            store_id,
            store_name,
            store_logo,
            on_sale,
            discount,
            image,
            description,
        } => {
            let mut item = CartItem::new(ItemId::new(id), name, price, final_price);
            item.is_on_sale = on_sale;
            item.discount_percentage = discount;
            item.image = image;
            item.description = description;
            if let Some(store_id) = store_id {
                item = item.with_store(StoreId::new(store_id), store_name, store_logo);
            }
            commands::cart::add(item)?;
        }
        Commands::Remove { id, store_id } => {
            let store_id = store_id.map(StoreId::new);
            commands::cart::remove(&ItemId::new(id), store_id.as_ref())?;
        }
        Commands::SetQuantity {
            id,
            quantity,
            store_id,
        } => {
            let store_id = store_id.map(StoreId::new);
            commands::cart::set_quantity(&ItemId::new(id), quantity, store_id.as_ref())?;
        }
        Commands::Clear => commands::cart::clear()?,
    }
    Ok(())
}
