//! Domain types for cart contents.

use serde::{Deserialize, Serialize};
use velvet_mango_core::{ItemId, Price, StoreId};

/// A line item in the cart.
///
/// Identity is `id` scoped to the item's store grouping: the same `id` may
/// appear under two different sellers without colliding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Item identifier, unique within its store grouping.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Pre-discount unit price.
    pub price: Price,
    /// Effective unit price after discount.
    pub final_price: Price,
    /// Units of this item in the cart. Always >= 1 while the item is present.
    pub quantity: u32,
    /// Whether the item is currently discounted.
    pub is_on_sale: bool,
    /// Discount applied to the list price, as a percentage (e.g. 15.0).
    pub discount_percentage: f64,
    /// Owning seller, if any. Items without one fall into the default grouping.
    pub store_id: Option<StoreId>,
    /// Seller display name.
    pub store_name: Option<String>,
    /// Seller logo URL.
    pub store_logo: Option<String>,
    /// Item image URL.
    pub image: Option<String>,
    /// Item description.
    pub description: Option<String>,
}

impl CartItem {
    /// Create a storeless line item with quantity 1 and no discount.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, price: Price, final_price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            final_price,
            quantity: 1,
            is_on_sale: false,
            discount_percentage: 0.0,
            store_id: None,
            store_name: None,
            store_logo: None,
            image: None,
            description: None,
        }
    }

    /// Attach seller information to the item.
    #[must_use]
    pub fn with_store(mut self, id: StoreId, name: Option<String>, logo: Option<String>) -> Self {
        self.store_id = Some(id);
        self.store_name = name;
        self.store_logo = logo;
        self
    }
}

/// Aggregate view of one seller's items in the cart.
///
/// Summaries are recomputed from the grouped item mapping after every
/// mutation; they are never updated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSummary {
    /// Seller identifier (the grouping key).
    pub id: StoreId,
    /// Seller display name, taken from the first item that carries one.
    pub name: Option<String>,
    /// Seller logo URL, taken from the first item that carries one.
    pub logo: Option<String>,
    /// The seller's items, in insertion order.
    pub items: Vec<CartItem>,
    /// Sum of quantities across the seller's items.
    pub total_items: u32,
    /// Sum of `final_price * quantity` across the seller's items.
    pub total_price: Price,
}
