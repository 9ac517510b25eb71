//! The shopping cart store.
//!
//! The cart is session-scoped state: a list of line items (product +
//! quantity) with derived totals, serialized as a JSON string under a fixed
//! session key after every mutation and rehydrated on load. Malformed
//! persisted data is logged and treated as an empty cart - a broken cart
//! must never take the shop down.
//!
//! Mutations return a [`CartNotice`] so the route layer can surface the
//! "added" / "quantity updated" / "removed" messages without the store
//! knowing anything about presentation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use ruche_core::{Product, ProductId};

/// Fixed session key the serialized item list lives under.
pub const CART_SESSION_KEY: &str = "cart";

/// A product plus a quantity (always >= 1 while in the cart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line total at the effective price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }
}

/// Notification emitted by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartNotice {
    ItemAdded { name: String },
    QuantityUpdated { name: String },
    ItemRemoved { name: String },
    Cleared,
}

/// The in-session cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The current line items.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` of `product`.
    ///
    /// If a line item for the same product id already exists its quantity is
    /// incremented, otherwise a new line item is appended. Always succeeds.
    pub fn add(&mut self, product: Product, quantity: u32) -> CartNotice {
        let quantity = quantity.max(1);
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += quantity;
            CartNotice::QuantityUpdated {
                name: product.name,
            }
        } else {
            let name = product.name.clone();
            self.items.push(CartItem { product, quantity });
            CartNotice::ItemAdded { name }
        }
    }

    /// Remove the line item for `product_id`.
    ///
    /// A missing item is a no-op and yields no notice.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartNotice> {
        let position = self.items.iter().position(|i| i.product.id == product_id)?;
        let removed = self.items.remove(position);
        Some(CartNotice::ItemRemoved {
            name: removed.product.name,
        })
    }

    /// Set the quantity of the line item for `product_id`.
    ///
    /// A quantity of zero or less removes the item; there is no upper bound.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Option<CartNotice> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantity = quantity.min(i64::from(u32::MAX)) as u32;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)?;
        item.quantity = quantity;
        Some(CartNotice::QuantityUpdated {
            name: item.product.name.clone(),
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartNotice {
        self.items.clear();
        CartNotice::Cleared
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of effective price x quantity over all line items.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Serialize the item list for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (it never does for valid
    /// items; the signature exists so callers propagate instead of panic).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Rehydrate a cart from persisted JSON.
    ///
    /// Parse failures are logged and yield an empty cart; no error escapes.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<CartItem>>(raw) {
            Ok(items) => Self { items },
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse persisted cart, starting empty");
                Self::new()
            }
        }
    }
}

// =============================================================================
// Session persistence
// =============================================================================

/// Load the cart from the session, degrading to empty on any failure.
pub async fn load(session: &Session) -> Cart {
    match session.get::<String>(CART_SESSION_KEY).await {
        Ok(Some(raw)) => Cart::from_json(&raw),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read cart from session, starting empty");
            Cart::new()
        }
    }
}

/// Persist the cart to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), crate::error::AppError> {
    let raw = cart
        .to_json()
        .map_err(|e| crate::error::AppError::Internal(format!("cart serialization: {e}")))?;
    session.insert(CART_SESSION_KEY, raw).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(name: &str, price: Decimal, discount: Option<Decimal>) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            category: "mode".to_string(),
            price,
            discount_price: discount,
            image: String::new(),
            description: String::new(),
            rating: 4.0,
            in_stock: true,
            featured: false,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let p = product("Chemise", Decimal::new(3000, 2), None);

        let first = cart.add(p.clone(), 1);
        assert_eq!(first, CartNotice::ItemAdded { name: "Chemise".to_string() });

        let second = cart.add(p.clone(), 2);
        assert_eq!(second, CartNotice::QuantityUpdated { name: "Chemise".to_string() });

        // One line item, summed quantity
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_total_items_sums_all_adds() {
        let mut cart = Cart::new();
        let p = product("Sac", Decimal::new(5000, 2), None);
        for q in [1, 4, 2] {
            cart.add(p.clone(), q);
        }
        assert_eq!(cart.total_items(), 7);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_total_price_uses_effective_price() {
        let mut cart = Cart::new();
        let full = product("Legging", Decimal::new(4000, 2), None);
        let promo = product("Sac", Decimal::new(5000, 2), Some(Decimal::new(4000, 2)));

        cart.add(full.clone(), 2); // 2 x 40.00
        cart.add(promo, 1); // 1 x 40.00 (discounted)

        assert_eq!(cart.total_price(), Decimal::new(12000, 2));

        // Changing one item's quantity leaves the other untouched
        cart.update_quantity(full.id, 1);
        assert_eq!(cart.total_price(), Decimal::new(8000, 2));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        let p = product("Chemise", Decimal::new(3000, 2), None);
        cart.add(p.clone(), 2);

        let notice = cart.update_quantity(p.id, 0);
        assert_eq!(notice, Some(CartNotice::ItemRemoved { name: "Chemise".to_string() }));
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        let p = product("Chemise", Decimal::new(3000, 2), None);
        cart.add(p.clone(), 2);

        cart.update_quantity(p.id, -3);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        let p = product("Chemise", Decimal::new(3000, 2), None);
        cart.add(p, 1);

        assert!(cart.remove(ProductId::generate()).is_none());
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(product("Chemise", Decimal::new(3000, 2), None), 3);

        assert_eq!(cart.clear(), CartNotice::Cleared);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut cart = Cart::new();
        cart.add(product("Sac", Decimal::new(5000, 2), Some(Decimal::new(4000, 2))), 2);

        let raw = cart.to_json().unwrap();
        let rehydrated = Cart::from_json(&raw);
        assert_eq!(rehydrated, cart);
        assert_eq!(rehydrated.total_price(), Decimal::new(8000, 2));
    }

    #[test]
    fn test_corrupt_persisted_cart_degrades_to_empty() {
        let cart = Cart::from_json("{not json at all");
        assert!(cart.items().is_empty());

        // Wrong shape is also treated as empty, not an error
        let cart = Cart::from_json(r#"{"items": 7}"#);
        assert!(cart.items().is_empty());
    }
}
