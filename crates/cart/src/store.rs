//! The cart state container and its mutation operations.

use std::collections::BTreeMap;

use velvet_mango_core::{ItemId, Price, StoreId};

use crate::item::{CartItem, StoreSummary};
use crate::snapshot::CartSnapshot;

/// Grouping key for items that carry no store id.
pub const DEFAULT_GROUP_KEY: &str = "default";

/// Resolve the grouping key for an optional store id.
fn group_key(store_id: Option<&StoreId>) -> String {
    store_id.map_or_else(|| DEFAULT_GROUP_KEY.to_owned(), |id| id.as_str().to_owned())
}

/// Outcome of a cart mutation.
///
/// Rejected or unknown inputs never error or mutate state; the outcome lets
/// callers distinguish an applied change from the two no-op paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a non-applied outcome means the cart was not changed"]
pub enum MutationOutcome {
    /// The mutation changed cart state.
    Applied,
    /// No item with the given id exists in the resolved grouping.
    UnknownItem,
    /// The requested quantity is negative (or not representable).
    InvalidQuantity,
}

impl MutationOutcome {
    /// Whether the mutation changed cart state.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// In-memory shopping cart state.
///
/// The grouped mapping from store key to line items is the single source of
/// truth. `stores`, `total_items`, and `total_price` are derived views,
/// recomputed from the mapping after every mutation.
///
/// Instances are explicitly constructed and passed by reference; there is no
/// shared global, so independent carts (e.g. in tests) never cross-contaminate.
///
/// Every operation runs to completion on the calling thread; exclusivity is
/// supplied by `&mut self`, and borrows returned by the read methods cannot
/// be held across a mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartStore {
    items: BTreeMap<String, Vec<CartItem>>,
    stores: Vec<StoreSummary>,
    total_items: u32,
    total_price: Price,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cart from a persisted snapshot.
    ///
    /// The snapshot's grouped mapping is authoritative: the derived views it
    /// carries are discarded and recomputed, so a stale or hand-edited
    /// snapshot cannot introduce an aggregate that disagrees with the items.
    #[must_use]
    pub fn from_snapshot(snapshot: CartSnapshot) -> Self {
        let mut cart = Self {
            items: snapshot.items,
            ..Self::default()
        };
        cart.rebuild_views();
        cart
    }

    /// Capture the current state as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.total_items,
            total_price: self.total_price,
            stores: self.stores.clone(),
        }
    }

    /// Add one unit of `item` to the cart.
    ///
    /// If the grouping already holds an item with the same id, its quantity
    /// is incremented by one and the input's remaining fields are ignored.
    /// Otherwise the item is appended to the grouping with quantity forced
    /// to 1, regardless of the quantity on the input.
    pub fn add_item(&mut self, item: CartItem) {
        let key = group_key(item.store_id.as_ref());
        let group = self.items.entry(key).or_default();

        if let Some(existing) = group.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += 1;
        } else {
            group.push(CartItem { quantity: 1, ..item });
        }

        self.rebuild_views();
    }

    /// Remove an item from the cart entirely, regardless of its quantity.
    ///
    /// Returns [`MutationOutcome::UnknownItem`] (and leaves the cart
    /// untouched) when no item with `id` exists in the resolved grouping.
    pub fn remove_item(&mut self, id: &ItemId, store_id: Option<&StoreId>) -> MutationOutcome {
        let key = group_key(store_id);
        let Some(group) = self.items.get_mut(&key) else {
            return MutationOutcome::UnknownItem;
        };

        let before = group.len();
        group.retain(|i| i.id != *id);
        if group.len() == before {
            return MutationOutcome::UnknownItem;
        }

        self.rebuild_views();
        MutationOutcome::Applied
    }

    /// Set an item's quantity.
    ///
    /// A quantity of 0 removes the item; a zero-quantity record is never
    /// retained. Negative quantities (and values beyond `u32::MAX`) are
    /// rejected without mutating.
    pub fn change_quantity(
        &mut self,
        id: &ItemId,
        new_quantity: i64,
        store_id: Option<&StoreId>,
    ) -> MutationOutcome {
        let key = group_key(store_id);
        let Some(group) = self.items.get_mut(&key) else {
            return MutationOutcome::UnknownItem;
        };
        let Some(index) = group.iter().position(|i| i.id == *id) else {
            return MutationOutcome::UnknownItem;
        };
        let Ok(quantity) = u32::try_from(new_quantity) else {
            return MutationOutcome::InvalidQuantity;
        };

        if quantity == 0 {
            group.remove(index);
        } else if let Some(item) = group.get_mut(index) {
            item.quantity = quantity;
        }

        self.rebuild_views();
        MutationOutcome::Applied
    }

    /// Reset the cart to the empty state. Idempotent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Items grouped by store key (store id, or [`DEFAULT_GROUP_KEY`]).
    #[must_use]
    pub const fn items(&self) -> &BTreeMap<String, Vec<CartItem>> {
        &self.items
    }

    /// Per-store summaries, one for each non-default grouping.
    #[must_use]
    pub fn stores(&self) -> &[StoreSummary] {
        &self.stores
    }

    /// Total quantity across all groupings.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Total `final_price * quantity` across all groupings.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute every derived view from the grouped mapping.
    ///
    /// Emptied groupings are dropped first, so snapshots never accumulate
    /// dead keys and each remaining non-default grouping maps to exactly one
    /// store summary.
    fn rebuild_views(&mut self) {
        self.items.retain(|_, group| !group.is_empty());

        let mut total_items = 0u32;
        let mut total_price = Price::ZERO;
        let mut stores = Vec::new();

        for (key, group) in &self.items {
            let group_items: u32 = group.iter().map(|item| item.quantity).sum();
            let group_price: Price = group
                .iter()
                .map(|item| item.final_price.line_total(item.quantity))
                .sum();

            total_items += group_items;
            total_price += group_price;

            // Storeless items count toward the root totals but are not
            // tracked as a store.
            if key.as_str() != DEFAULT_GROUP_KEY {
                stores.push(StoreSummary {
                    id: StoreId::new(key.clone()),
                    name: group.iter().find_map(|item| item.store_name.clone()),
                    logo: group.iter().find_map(|item| item.store_logo.clone()),
                    items: group.clone(),
                    total_items: group_items,
                    total_price: group_price,
                });
            }
        }

        self.stores = stores;
        self.total_items = total_items;
        self.total_price = total_price;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    fn item(id: &str, final_price: &str) -> CartItem {
        CartItem::new(ItemId::new(id), id.to_owned(), price(final_price), price(final_price))
    }

    fn store_item(id: &str, final_price: &str, store: &str) -> CartItem {
        item(id, final_price).with_store(
            StoreId::new(store),
            Some(format!("{store} name")),
            None,
        )
    }

    /// Assert the totals and store-mirroring invariants against the grouped
    /// mapping, the single source of truth.
    fn assert_invariants(cart: &CartStore) {
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
            assert_eq!(summary.total_items, group.iter().map(|i| i.quantity).sum::<u32>());
            assert_eq!(
                summary.total_price,
                group
                    .iter()
                    .map(|i| i.final_price.line_total(i.quantity))
                    .sum::<Price>()
            );
        }
    }

    #[test]
    fn test_add_forces_quantity_to_one() {
        let mut cart = CartStore::new();
        let mut input = item("a", "10");
        input.quantity = 7;

        cart.add_item(input);

        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), price("10"));
        assert_invariants(&cart);
    }

    #[test]
    fn test_add_same_id_increments_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(item("a", "10"));
        cart.add_item(item("a", "10"));

        let group = cart.items().get(DEFAULT_GROUP_KEY).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.first().unwrap().quantity, 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), price("20"));
        assert_invariants(&cart);
    }

    #[test]
    fn test_same_id_in_different_stores_does_not_collide() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(store_item("a", "3", "s2"));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), price("13"));
        assert_eq!(cart.stores().len(), 2);
        assert_invariants(&cart);
    }

    #[test]
    fn test_storeless_items_not_tracked_in_stores() {
        let mut cart = CartStore::new();
        cart.add_item(item("a", "5"));

        assert!(cart.stores().is_empty());
        assert_eq!(cart.total_items(), 1);
        assert_invariants(&cart);
    }

    #[test]
    fn test_store_metadata_from_first_item_carrying_it() {
        let mut cart = CartStore::new();
        // First item has no name; the second does.
        cart.add_item(item("a", "5").with_store(StoreId::new("s1"), None, None));
        cart.add_item(item("b", "5").with_store(
            StoreId::new("s1"),
            Some("Mango Mart".to_owned()),
            Some("logo.png".to_owned()),
        ));

        let store = cart.stores().first().unwrap();
        assert_eq!(store.name.as_deref(), Some("Mango Mart"));
        assert_eq!(store.logo.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        let before = cart.clone();

        let outcome = cart.remove_item(&ItemId::new("missing"), Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::UnknownItem);

        // Wrong grouping is also unknown, even though the id exists elsewhere.
        let outcome = cart.remove_item(&ItemId::new("a"), None);
        assert_eq!(outcome, MutationOutcome::UnknownItem);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(store_item("b", "4", "s1"));
        assert_eq!(cart.total_items(), 3);

        let outcome = cart.remove_item(&ItemId::new("a"), Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), price("4"));
        assert_invariants(&cart);
    }

    #[test]
    fn test_remove_last_item_drops_store_and_grouping() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));

        let outcome = cart.remove_item(&ItemId::new("a"), Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert!(cart.stores().is_empty());
        assert!(cart.items().is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_prior_totals() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        let items_before = cart.total_items();
        let price_before = cart.total_price();
        let stores_before = cart.stores().len();

        cart.add_item(store_item("x", "2.50", "s2"));
        let outcome = cart.remove_item(&ItemId::new("x"), Some(&StoreId::new("s2")));
        assert_eq!(outcome, MutationOutcome::Applied);

        assert_eq!(cart.total_items(), items_before);
        assert_eq!(cart.total_price(), price_before);
        assert_eq!(cart.stores().len(), stores_before);
        assert_invariants(&cart);
    }

    #[test]
    fn test_change_quantity_negative_is_rejected() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        let before = cart.clone();

        let outcome = cart.change_quantity(&ItemId::new("a"), -1, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::InvalidQuantity);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_change_quantity_unknown_item_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        let before = cart.clone();

        let outcome = cart.change_quantity(&ItemId::new("b"), 3, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::UnknownItem);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_change_quantity_zero_removes_item() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(store_item("b", "4", "s1"));

        let outcome = cart.change_quantity(&ItemId::new("a"), 0, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), price("4"));
        assert_invariants(&cart);
    }

    #[test]
    fn test_change_quantity_zero_on_last_item_drops_store() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));

        let outcome = cart.change_quantity(&ItemId::new("a"), 0, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert!(cart.stores().is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_adjusts_totals() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(item("loose", "1"));

        let outcome = cart.change_quantity(&ItemId::new("a"), 5, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(cart.total_items(), 6);
        assert_eq!(cart.total_price(), price("51"));
        assert_invariants(&cart);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));
        cart.add_item(item("b", "2"));

        cart.clear();
        let once = cart.clone();
        cart.clear();

        assert_eq!(cart, once);
        assert_eq!(cart, CartStore::new());
    }

    #[test]
    fn test_single_store_lifecycle() {
        let mut cart = CartStore::new();

        cart.add_item(store_item("a", "10", "s1"));
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), price("10"));
        let store = cart.stores().first().unwrap();
        assert_eq!(store.id.as_str(), "s1");
        assert_eq!(store.total_items, 1);
        assert_eq!(store.total_price, price("10"));
        assert_eq!(store.items.first().unwrap().quantity, 1);

        cart.add_item(store_item("a", "10", "s1"));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), price("20"));
        let group = cart.items().get("s1").unwrap();
        assert_eq!(group.first().unwrap().quantity, 2);

        let outcome = cart.change_quantity(&ItemId::new("a"), 5, Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), price("50"));

        let outcome = cart.remove_item(&ItemId::new("a"), Some(&StoreId::new("s1")));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
        assert!(cart.stores().is_empty());
    }

    #[test]
    fn test_invariants_hold_after_every_step_of_a_sequence() {
        let mut cart = CartStore::new();
        let s1 = StoreId::new("s1");
        let s2 = StoreId::new("s2");

        cart.add_item(store_item("a", "9.99", "s1"));
        assert_invariants(&cart);
        cart.add_item(store_item("b", "0.50", "s1"));
        assert_invariants(&cart);
        cart.add_item(store_item("a", "1", "s2"));
        assert_invariants(&cart);
        cart.add_item(item("loose", "3.25"));
        assert_invariants(&cart);
        let _ = cart.change_quantity(&ItemId::new("b"), 4, Some(&s1));
        assert_invariants(&cart);
        let _ = cart.change_quantity(&ItemId::new("loose"), 2, None);
        assert_invariants(&cart);
        let _ = cart.remove_item(&ItemId::new("a"), Some(&s1));
        assert_invariants(&cart);
        let _ = cart.change_quantity(&ItemId::new("a"), 0, Some(&s2));
        assert_invariants(&cart);
        cart.clear();
        assert_invariants(&cart);
    }

    #[test]
    fn test_from_snapshot_recomputes_stale_aggregates() {
        let mut cart = CartStore::new();
        cart.add_item(store_item("a", "10", "s1"));

        let mut snapshot = cart.snapshot();
        // Corrupt the derived fields; the grouped mapping is authoritative.
        snapshot.total_items = 99;
        snapshot.total_price = price("999");
        snapshot.stores.clear();

        let restored = CartStore::from_snapshot(snapshot);
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_snapshot_drops_empty_groupings() {
        let mut snapshot = CartStore::new().snapshot();
        snapshot.items.insert("ghost".to_owned(), Vec::new());

        let restored = CartStore::from_snapshot(snapshot);
        assert!(restored.items().is_empty());
        assert!(restored.stores().is_empty());
    }
}
