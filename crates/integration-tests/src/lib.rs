//! Integration tests for Velvet Mango.
//!
//! Cross-crate scenario tests exercising the cart state container together
//! with its snapshot persistence:
//!
//! - `cart_lifecycle` - full mutation sequences through a persisted cart,
//!   with the totals and store-mirroring invariants checked at every step
//! - `cart_snapshot_recovery` - cold starts, corrupt snapshot data, and
//!   stale hand-edited aggregates
//!
//! The helpers below build sample line items and assert the cart invariants
//! so individual tests stay focused on their scenario.

#![cfg_attr(not(test), forbid(unsafe_code))]

use velvet_mango_cart::{CartItem, CartStore, DEFAULT_GROUP_KEY};
use velvet_mango_core::{ItemId, Price, StoreId};

/// Parse a price literal.
///
/// # Panics
///
/// Panics when `s` is not a valid price; fixtures use literals.
#[must_use]
pub fn price(s: &str) -> Price {
    s.parse().expect("fixture price must parse")
}

/// A storeless line item with equal list and final price.
#[must_use]
pub fn loose_item(id: &str, final_price: &str) -> CartItem {
    CartItem::new(ItemId::new(id), id.to_owned(), price(final_price), price(final_price))
}

/// A line item belonging to `store`.
#[must_use]
pub fn store_item(id: &str, final_price: &str, store: &str) -> CartItem {
    loose_item(id, final_price).with_store(
        StoreId::new(store),
        Some(format!("{store} name")),
        None,
    )
}

/// Assert the totals and store-mirroring invariants against the grouped
/// item mapping, the single source of truth.
///
/// # Panics
///
/// Panics when an aggregate disagrees with the items it is derived from, or
/// when a non-default grouping lacks exactly one matching store summary.
pub fn assert_cart_invariants(cart: &CartStore) {
    let expected_items: u32 = cart.items().values().flatten().map(|i| i.quantity).sum();
    let expected_price: Price = cart
        .items()
        .values()
        .flatten()
        .map(|i| i.final_price.line_total(i.quantity))
        .sum();
    assert_eq!(cart.total_items(), expected_items);
    assert_eq!(cart.total_price(), expected_price);

    let keyed: Vec<_> = cart
        .items()
        .iter()
        .filter(|(key, _)| key.as_str() != DEFAULT_GROUP_KEY)
        .collect();
    assert_eq!(cart.stores().len(), keyed.len());
    for (key, group) in keyed {
        let summary = cart
            .stores()
            .iter()
            .find(|s| s.id.as_str() == key)
            .expect("non-empty grouping must have a store summary");
        assert_eq!(&summary.items, group);
        assert_eq!(
            summary.total_items,
            group.iter().map(|i| i.quantity).sum::<u32>()
        );
        assert_eq!(
            summary.total_price,
            group
                .iter()
                .map(|i| i.final_price.line_total(i.quantity))
                .sum::<Price>()
        );
    }
}
