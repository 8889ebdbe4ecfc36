//! Cart management commands.
//!
//! Every command opens the persisted cart from the configured data
//! directory, applies its mutation (or just reads, for `show`), and reports
//! the outcome. No-op outcomes (unknown item, rejected quantity) are
//! reported as warnings, not errors; only a failed snapshot write fails the
//! command.
//!
//! # Environment Variables
//!
//! - `VELVET_MANGO_DATA_DIR` - Directory holding the cart snapshot
//!   (default: `./data`)

use std::path::PathBuf;

use thiserror::Error;
use velvet_mango_cart::{
    CartItem, FileSnapshotStore, MutationOutcome, PersistentCart, SnapshotError,
};
use velvet_mango_core::{ItemId, StoreId};

/// Environment variable naming the snapshot directory.
const DATA_DIR_VAR: &str = "VELVET_MANGO_DATA_DIR";

/// Fallback snapshot directory when the variable is unset.
const DEFAULT_DATA_DIR: &str = "./data";

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Writing the cart snapshot failed. The in-memory mutation was applied
    /// but is lost with the process.
    #[error("Failed to persist cart: {0}")]
    Persist(#[from] SnapshotError),
}

/// Open the persisted cart from the configured data directory.
fn open_cart() -> PersistentCart<FileSnapshotStore> {
    dotenvy::dotenv().ok();

    let dir = std::env::var(DATA_DIR_VAR).map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
    tracing::debug!(dir = %dir.display(), "Opening cart");
    PersistentCart::open(FileSnapshotStore::new(dir))
}

/// Report a mutation outcome to the operator.
fn report(outcome: MutationOutcome, applied: &str, total_items: u32) {
    match outcome {
        MutationOutcome::Applied => {
            tracing::info!("{applied}; cart now holds {total_items} item(s)");
        }
        MutationOutcome::UnknownItem => {
            tracing::warn!("No matching item in that grouping; cart unchanged");
        }
        MutationOutcome::InvalidQuantity => {
            tracing::warn!("Quantity must be zero or positive; cart unchanged");
        }
    }
}

/// Report the cart: totals, per-store summaries, line items.
pub fn show() {
    let cart = open_cart();
    let cart = cart.cart();

    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    tracing::info!(
        "Cart holds {} item(s), {} total",
        cart.total_items(),
        cart.total_price()
    );
    for store in cart.stores() {
        tracing::info!(
            "Store {} ({}): {} item(s), {}",
            store.id,
            store.name.as_deref().unwrap_or("unnamed"),
            store.total_items,
            store.total_price
        );
    }
    for (key, group) in cart.items() {
        for item in group {
            tracing::info!(
                "  [{key}] {} \"{}\" x{} @ {} = {}",
                item.id,
                item.name,
                item.quantity,
                item.final_price,
                item.final_price.line_total(item.quantity)
            );
        }
    }
}

/// Add one unit of `item` to the cart.
///
/// # Errors
///
/// Returns [`CartCommandError::Persist`] if the snapshot write fails.
pub fn add(item: CartItem) -> Result<(), CartCommandError> {
    let mut cart = open_cart();
    let id = item.id.clone();
    cart.add_item(item)?;
    tracing::info!(
        "Added one unit of {id}; cart now holds {} item(s)",
        cart.cart().total_items()
    );
    Ok(())
}

/// Remove an item from the cart entirely.
///
/// # Errors
///
/// Returns [`CartCommandError::Persist`] if the snapshot write fails.
pub fn remove(id: &ItemId, store_id: Option<&StoreId>) -> Result<(), CartCommandError> {
    let mut cart = open_cart();
    let outcome = cart.remove_item(id, store_id)?;
    report(outcome, &format!("Removed {id}"), cart.cart().total_items());
    Ok(())
}

/// Set an item's quantity.
///
/// # Errors
///
/// Returns [`CartCommandError::Persist`] if the snapshot write fails.
pub fn set_quantity(
    id: &ItemId,
    quantity: i64,
    store_id: Option<&StoreId>,
) -> Result<(), CartCommandError> {
    let mut cart = open_cart();
    let outcome = cart.change_quantity(id, quantity, store_id)?;
    report(
        outcome,
        &format!("Set {id} to quantity {quantity}"),
        cart.cart().total_items(),
    );
    Ok(())
}

/// Reset the cart to the empty state.
///
/// # Errors
///
/// Returns [`CartCommandError::Persist`] if the snapshot write fails.
pub fn clear() -> Result<(), CartCommandError> {
    let mut cart = open_cart();
    cart.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
