//! Velvet Mango Cart - shopping cart state container.
//!
//! A single-threaded, in-memory cart over line items grouped by seller.
//! Mutations go through four entry points (`add_item`, `remove_item`,
//! `change_quantity`, `clear`); every read surface is a derived view
//! recomputed from the grouped item mapping, so the denormalized per-store
//! summaries can never drift from the items they mirror.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - authoritative state and the four mutations
//! - [`snapshot`] - JSON snapshot types and the [`snapshot::SnapshotStore`]
//!   backend seam (file-backed implementation included)
//! - [`persist::PersistentCart`] - couples a cart to a snapshot backend:
//!   restore on open, write-through after each successful mutation
//!
//! Persistence is best-effort: the in-memory mutation is authoritative and
//! is never rolled back when a snapshot write fails; the failure is returned
//! to the caller instead of being swallowed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod item;
pub mod persist;
pub mod snapshot;
pub mod store;

pub use error::SnapshotError;
pub use item::{CartItem, StoreSummary};
pub use persist::PersistentCart;
pub use snapshot::{CART_SNAPSHOT_KEY, CartSnapshot, FileSnapshotStore, SnapshotStore};
pub use store::{CartStore, DEFAULT_GROUP_KEY, MutationOutcome};
