//! # Cart
//!
//! The pure cart model: an ordered list of line items keyed by variant.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(P1, 2)            ──► [ P1 ×2 ]                               │
//! │  add_item(P1, 1)            ──► [ P1 ×3 ]              same key, merge  │
//! │  add_item(P1, 1, red)       ──► [ P1 ×3, P1/red ×1 ]   new key, append  │
//! │                                                                         │
//! │  VariantKey = (product_id, color, size)                                 │
//! │                                                                         │
//! │  remove_item(P1)            ──► [ ]     matches on product id ONLY      │
//! │  remove_variant(P1/red)     ──► [ P1 ×3 ]   exact key                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Values
//! Lines carry no product data, only the id. `item_count()` and
//! `total_price()` are recomputed from the line list on every call, with
//! prices resolved through a [`PriceLookup`] at read time. A catalog price
//! change therefore shows up in every cart holding that product. There is
//! no cached total to keep in sync.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::PriceLookup;
use crate::money::Money;
use crate::product::Product;

// =============================================================================
// Variant Key
// =============================================================================

/// Identity of a cart line: the product plus the selected options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VariantKey {
    pub product_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl VariantKey {
    pub fn new(
        product_id: impl Into<String>,
        color: Option<String>,
        size: Option<String>,
    ) -> Self {
        VariantKey {
            product_id: product_id.into(),
            color,
            size,
        }
    }

    /// Key with no color or size selected.
    pub fn plain(product_id: impl Into<String>) -> Self {
        VariantKey::new(product_id, None, None)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Product reference, resolved against the catalog when priced.
    pub product_id: String,

    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLineItem {
    /// Returns this line's variant key.
    pub fn key(&self) -> VariantKey {
        VariantKey::new(self.product_id.clone(), self.color.clone(), self.size.clone())
    }

    fn matches(&self, key: &VariantKey) -> bool {
        self.product_id == key.product_id && self.color == key.color && self.size == key.size
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines keep first-insertion order
/// - No two lines share a [`VariantKey`]
///
/// Lines are only reachable through the methods below; read them with
/// [`Cart::lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product, merging into an existing line with the same variant.
    ///
    /// ## Behavior
    /// - Same `(product, color, size)` already present: quantity grows
    /// - Otherwise: a new line is appended
    ///
    /// The quantity is not clamped. Never fails.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
    ) {
        let key = VariantKey::new(product.id.clone(), color, size);

        if let Some(line) = self.items.iter_mut().find(|l| l.matches(&key)) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartLineItem {
            product_id: key.product_id,
            quantity,
            color: key.color,
            size: key.size,
        });
    }

    /// Removes every line for `product_id`, whatever its color or size.
    ///
    /// Unknown ids are a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|l| l.product_id != product_id);
    }

    /// Removes the single line with exactly this key.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove_variant(&mut self, key: &VariantKey) -> bool {
        let before = self.items.len();
        self.items.retain(|l| !l.matches(key));
        self.items.len() != before
    }

    /// Sets the quantity of every line for `product_id` to `max(1, quantity)`.
    ///
    /// Zero or negative input pins the line at 1; it never removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        let quantity = quantity.clamp(1, u32::MAX as i64) as u32;
        for line in self.items.iter_mut().filter(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up the line for an exact variant.
    pub fn line(&self, key: &VariantKey) -> Option<&CartLineItem> {
        self.items.iter().find(|l| l.matches(key))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines (the cart badge).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| l.quantity as u64).sum()
    }

    /// Current price × quantity for one line; zero if the product is unknown.
    pub fn line_total<L: PriceLookup + ?Sized>(line: &CartLineItem, lookup: &L) -> Money {
        lookup
            .price_of(&line.product_id)
            .map(|price| price * line.quantity)
            .unwrap_or_default()
    }

    /// Sum of current price × quantity across all lines.
    pub fn total_price<L: PriceLookup + ?Sized>(&self, lookup: &L) -> Money {
        self.items
            .iter()
            .map(|line| Cart::line_total(line, lookup))
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn p(catalog: &Catalog, id: &str) -> Product {
        catalog.get_by_id(id).cloned().unwrap()
    }

    fn red() -> Option<String> {
        Some("red".to_string())
    }

    #[test]
    fn test_same_variant_merges_into_one_line() {
        let catalog = Catalog::demo();
        let p1 = p(&catalog, "1");
        let mut cart = Cart::new();

        cart.add_item(&p1, 2, None, None);
        cart.add_item(&p1, 1, None, None);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.total_price(&catalog), p1.price * 3);
    }

    #[test]
    fn test_distinct_variants_keep_insertion_order() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();

        cart.add_item(&p(&catalog, "1"), 1, red(), None);
        cart.add_item(&p(&catalog, "1"), 1, Some("blue".to_string()), None);
        cart.add_item(&p(&catalog, "4"), 1, None, Some("M".to_string()));
        cart.add_item(&p(&catalog, "1"), 4, red(), None);

        let keys: Vec<_> = cart.lines().iter().map(|l| l.key()).collect();
        assert_eq!(
            keys,
            vec![
                VariantKey::new("1", red(), None),
                VariantKey::new("1", Some("blue".to_string()), None),
                VariantKey::new("4", None, Some("M".to_string())),
            ]
        );
        assert_eq!(cart.line(&keys[0]).unwrap().quantity, 5);
    }

    #[test]
    fn test_item_count_and_total() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "1"), 2, None, None); // 2 × 129.99
        cart.add_item(&p(&catalog, "4"), 3, None, None); // 3 × 29.99

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total_price(&catalog).cents(), 2 * 12999 + 3 * 2999);
    }

    #[test]
    fn test_total_uses_current_price() {
        let mut catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "4"), 2, None, None);

        catalog.set_price("4", Money::from_cents(1000));
        assert_eq!(cart.total_price(&catalog).cents(), 2000);
    }

    #[test]
    fn test_unknown_product_contributes_zero() {
        let catalog = Catalog::demo();
        let mut ghost = p(&catalog, "1");
        ghost.id = "gone".to_string();

        let mut cart = Cart::new();
        cart.add_item(&ghost, 2, None, None);
        cart.add_item(&p(&catalog, "4"), 1, None, None);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_price(&catalog).cents(), 2999);
    }

    #[test]
    fn test_update_quantity_floors_at_one() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "2"), 3, None, None);

        for q in [0, -1, -50] {
            cart.update_quantity("2", q);
            assert_eq!(cart.lines()[0].quantity, 1);
        }

        cart.update_quantity("2", 7);
        assert_eq!(cart.lines()[0].quantity, 7);

        // unknown id
        cart.update_quantity("999", 4);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_update_quantity_applies_to_every_variant_of_product() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "4"), 1, None, Some("S".to_string()));
        cart.add_item(&p(&catalog, "4"), 2, None, Some("L".to_string()));

        cart.update_quantity("4", 3);
        assert!(cart.lines().iter().all(|l| l.quantity == 3));
    }

    #[test]
    fn test_remove_item_matches_product_id_across_variants() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "1"), 1, red(), None);
        cart.add_item(&p(&catalog, "1"), 1, Some("blue".to_string()), None);
        cart.add_item(&p(&catalog, "2"), 1, None, None);

        // Both color variants of product 1 go, not just one.
        cart.remove_item("1");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product_id, "2");

        // idempotent
        cart.remove_item("1");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_variant_is_exact() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "1"), 1, red(), None);
        cart.add_item(&p(&catalog, "1"), 1, None, None);

        assert!(cart.remove_variant(&VariantKey::new("1", red(), None)));
        assert!(!cart.remove_variant(&VariantKey::new("1", red(), None)));
        assert_eq!(cart.lines()[0].key(), VariantKey::plain("1"));
    }

    #[test]
    fn test_clear() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "3"), 2, None, None);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(cart.total_price(&catalog).is_zero());
    }

    #[test]
    fn test_persisted_line_shape() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add_item(&p(&catalog, "1"), 2, red(), None);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "items": [{ "productId": "1", "quantity": 2, "color": "red" }] })
        );

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.lines()[0].quantity, 2);
    }
}
