//! Write-through coupling of a cart to a snapshot backend.

use velvet_mango_core::{ItemId, StoreId};

use crate::error::SnapshotError;
use crate::item::CartItem;
use crate::snapshot::{CART_SNAPSHOT_KEY, SnapshotStore};
use crate::store::{CartStore, MutationOutcome};

/// A [`CartStore`] persisted through a [`SnapshotStore`] backend.
///
/// Opening restores the cart from the snapshot under [`CART_SNAPSHOT_KEY`]
/// (or starts empty). Each mutation applies in memory first and then writes
/// the full snapshot.
///
/// The in-memory state is authoritative: a failed write is returned to the
/// caller but never rolls the mutation back, so the persisted copy may lag
/// until the next successful write. Mutations that change nothing skip the
/// write entirely.
pub struct PersistentCart<S> {
    cart: CartStore,
    backend: S,
}

impl<S: SnapshotStore> PersistentCart<S> {
    /// Open the cart persisted in `backend`, or an empty cart when no usable
    /// snapshot exists.
    ///
    /// Backend read failures degrade to the empty cart with a warning;
    /// opening never fails.
    pub fn open(backend: S) -> Self {
        let cart = match backend.load(CART_SNAPSHOT_KEY) {
            Ok(Some(snapshot)) => CartStore::from_snapshot(snapshot),
            Ok(None) => CartStore::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cart snapshot; starting empty");
                CartStore::new()
            }
        };
        Self { cart, backend }
    }

    /// Add one unit of `item` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot write fails. The item has
    /// already been added in memory.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), SnapshotError> {
        self.cart.add_item(item);
        self.persist()
    }

    /// Remove an item and persist when the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot write fails. The removal
    /// has already been applied in memory.
    pub fn remove_item(
        &mut self,
        id: &ItemId,
        store_id: Option<&StoreId>,
    ) -> Result<MutationOutcome, SnapshotError> {
        let outcome = self.cart.remove_item(id, store_id);
        if outcome.is_applied() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Set an item's quantity and persist when the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot write fails. The quantity
    /// change has already been applied in memory.
    pub fn change_quantity(
        &mut self,
        id: &ItemId,
        new_quantity: i64,
        store_id: Option<&StoreId>,
    ) -> Result<MutationOutcome, SnapshotError> {
        let outcome = self.cart.change_quantity(id, new_quantity, store_id);
        if outcome.is_applied() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Reset the cart to empty and persist.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot write fails. The cart has
    /// already been cleared in memory.
    pub fn clear(&mut self) -> Result<(), SnapshotError> {
        self.cart.clear();
        self.persist()
    }

    /// Read access to the underlying cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Consume the wrapper, detaching the cart from its backend.
    #[must_use]
    pub fn into_cart(self) -> CartStore {
        self.cart
    }

    fn persist(&self) -> Result<(), SnapshotError> {
        self.backend.save(CART_SNAPSHOT_KEY, &self.cart.snapshot())
    }
}
