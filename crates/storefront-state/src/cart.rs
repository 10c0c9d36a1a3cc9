//! # Cart Store
//!
//! The owned, injectable cart the presentation layer talks to.
//!
//! ## Thread Safety
//! The cart sits behind `Arc<Mutex<Cart>>`. Every operation takes the lock,
//! mutates, serializes the new snapshot and hands it to the persistence
//! writer before releasing. Nothing awaits while the lock is held.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen Action            CartStore                 Persisted           │
//! │  ─────────────            ─────────                 ─────────           │
//! │                                                                         │
//! │  Add to cart ───────────► add_item()        ──────► cart-storage        │
//! │  Stepper +/- ───────────► update_quantity() ──────► cart-storage        │
//! │  Trash icon ────────────► remove_item()     ──────► cart-storage        │
//! │  Place order ───────────► place_order()     ──────► cart-storage (empty)│
//! │                                                                         │
//! │  Badge / totals ────────► item_count(), total_price()   (read only,     │
//! │                           priced against the live catalog)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use storefront_core::checkout;
use storefront_core::{
    Cart, CartLineItem, Catalog, CheckoutSummary, CoreError, CoreResult, Money, Order,
    PaymentMethod, Product, TaxRate, User, VariantKey,
};
use storefront_db::{snapshot, KeyValueStore, LoadStatus};

use crate::persist::PersistHandle;
use crate::CART_STORAGE_KEY;

/// Cart state shared across the app.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    catalog: Arc<Catalog>,
    persist: PersistHandle,
}

impl CartStore {
    /// Creates an empty cart.
    pub fn new(catalog: Arc<Catalog>, persist: PersistHandle) -> Self {
        CartStore::from_cart(Cart::new(), catalog, persist)
    }

    fn from_cart(cart: Cart, catalog: Arc<Catalog>, persist: PersistHandle) -> Self {
        CartStore {
            cart: Arc::new(Mutex::new(cart)),
            catalog,
            persist,
        }
    }

    /// Restores the cart from `cart-storage`, falling back to empty.
    pub async fn rehydrate<S: KeyValueStore>(
        store: &S,
        catalog: Arc<Catalog>,
        persist: PersistHandle,
    ) -> (Self, LoadStatus) {
        let (cart, status) = snapshot::load_or_default::<Cart, _>(store, CART_STORAGE_KEY)
            .await
            .resolve();

        info!(?status, lines = cart.lines().len(), "Cart rehydrated");
        (CartStore::from_cart(cart, catalog, persist), status)
    }

    // =========================================================================
    // Lock helpers
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // A panic mid-mutation leaves a structurally valid Vec; keep going.
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Mutates the cart and persists the result.
    fn mutate<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        let result = f(&mut cart);
        self.persist.write(CART_STORAGE_KEY, &*cart);
        result
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` of a product, merging with an identical variant.
    pub fn add_item(
        &self,
        product: &Product,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
    ) {
        debug!(product_id = %product.id, quantity, ?color, ?size, "Adding to cart");
        self.mutate(|cart| cart.add_item(product, quantity, color, size));
    }

    /// Looks the product up in the catalog, then adds it.
    pub fn add_by_id(
        &self,
        product_id: &str,
        quantity: u32,
        color: Option<String>,
        size: Option<String>,
    ) -> CoreResult<()> {
        let product = self
            .catalog
            .get_by_id(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        self.add_item(product, quantity, color, size);
        Ok(())
    }

    /// Removes every line for `product_id`, across variants.
    pub fn remove_item(&self, product_id: &str) {
        debug!(product_id = %product_id, "Removing from cart");
        self.mutate(|cart| cart.remove_item(product_id));
    }

    /// Removes the line with exactly this variant.
    pub fn remove_variant(&self, key: &VariantKey) -> bool {
        debug!(
            product_id = %key.product_id,
            color = ?key.color,
            size = ?key.size,
            "Removing variant from cart"
        );
        self.mutate(|cart| cart.remove_variant(key))
    }

    /// Sets every line for `product_id` to `max(1, quantity)`.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) {
        debug!(product_id = %product_id, quantity, "Updating cart quantity");
        self.mutate(|cart| cart.update_quantity(product_id, quantity));
    }

    pub fn clear(&self) {
        debug!("Clearing cart");
        self.mutate(Cart::clear);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn item_count(&self) -> u64 {
        self.with_cart(Cart::item_count)
    }

    /// Total at current catalog prices.
    pub fn total_price(&self) -> Money {
        self.with_cart(|cart| cart.total_price(self.catalog.as_ref()))
    }

    pub fn lines(&self) -> Vec<CartLineItem> {
        self.with_cart(|cart| cart.lines().to_vec())
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    /// A copy of the whole cart.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn checkout_summary(&self, rate: TaxRate) -> CheckoutSummary {
        self.with_cart(|cart| CheckoutSummary::for_cart(cart, &self.catalog, rate))
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Places an order for the current cart and empties it.
    ///
    /// ## Errors
    /// - `EmptyCart` when there is nothing to order
    /// - `AddressNotFound` when `address_id` is unknown, or the user has no
    ///   addresses at all
    /// - `ProductNotFound` when a line's product left the catalog
    ///
    /// On error the cart is left as it was.
    pub fn place_order(
        &self,
        user: &User,
        address_id: Option<&str>,
        payment_method: PaymentMethod,
        rate: TaxRate,
    ) -> CoreResult<Order> {
        let mut cart = self.lock();
        let order = checkout::place_order(&cart, &self.catalog, user, address_id, payment_method, rate)?;

        cart.clear();
        self.persist.write(CART_STORAGE_KEY, &*cart);

        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::user::demo_user;
    use storefront_db::MemoryStore;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::demo())
    }

    async fn persisted_cart(store: &MemoryStore) -> Option<Cart> {
        snapshot::load(store, CART_STORAGE_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn test_mutations_write_through() {
        let store = MemoryStore::new();
        let persist = PersistHandle::spawn(store.clone());
        let cart = CartStore::new(catalog(), persist.clone());

        cart.add_by_id("1", 2, None, None).unwrap();
        cart.add_by_id("1", 1, None, None).unwrap();
        persist.flush().await.unwrap();

        let saved = persisted_cart(&store).await.unwrap();
        assert_eq!(saved.lines().len(), 1);
        assert_eq!(saved.lines()[0].quantity, 3);
        assert_eq!(cart.total_price(), Money::from_cents(3 * 12999));
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected_by_id() {
        let cart = CartStore::new(catalog(), PersistHandle::detached());
        let err = cart.add_by_id("404", 1, None, None).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "404"));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_rehydrate_after_restart() {
        let store = MemoryStore::new();
        let persist = PersistHandle::spawn(store.clone());
        let before = CartStore::new(catalog(), persist.clone());
        before.add_by_id("4", 2, None, Some("M".to_string())).unwrap();
        before.add_by_id("1", 1, Some("#000000".to_string()), None).unwrap();
        before.update_quantity("4", 0);
        persist.shutdown().await.unwrap();

        let (after, status) =
            CartStore::rehydrate(&store, catalog(), PersistHandle::detached()).await;
        assert_eq!(status, LoadStatus::Restored);
        assert_eq!(after.snapshot(), before.snapshot());
        assert_eq!(after.item_count(), 2);
    }

    #[tokio::test]
    async fn test_rehydrate_corrupt_record_starts_empty() {
        let store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, "[[[").await.unwrap();

        let (cart, status) =
            CartStore::rehydrate(&store, catalog(), PersistHandle::detached()).await;
        assert_eq!(status, LoadStatus::Fallback);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_zeroes_derived_values() {
        let cart = CartStore::new(catalog(), PersistHandle::detached());
        cart.add_by_id("2", 1, None, None).unwrap();
        cart.add_by_id("7", 4, None, None).unwrap();
        cart.clear();

        assert_eq!(cart.item_count(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[tokio::test]
    async fn test_checkout_summary() {
        let cart = CartStore::new(catalog(), PersistHandle::detached());
        cart.add_by_id("4", 2, None, None).unwrap(); // 59.98

        let summary = cart.checkout_summary(TaxRate::CHECKOUT_DEFAULT);
        assert_eq!(summary.subtotal.cents(), 5998);
        assert_eq!(summary.tax.cents(), 600);
        assert_eq!(summary.total.cents(), 6598);
    }

    #[tokio::test]
    async fn test_place_order_clears_and_persists() {
        let store = MemoryStore::new();
        let persist = PersistHandle::spawn(store.clone());
        let cart = CartStore::new(catalog(), persist.clone());
        cart.add_by_id("3", 1, None, None).unwrap();

        let order = cart
            .place_order(&demo_user(), None, PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT)
            .unwrap();
        assert_eq!(order.items.len(), 1);
        assert!(cart.is_empty());

        persist.flush().await.unwrap();
        assert!(persisted_cart(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_order_errors_leave_cart_alone() {
        let cart = CartStore::new(catalog(), PersistHandle::detached());
        let user = demo_user();

        let err = cart
            .place_order(&user, None, PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT)
            .unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));

        cart.add_by_id("3", 1, None, None).unwrap();
        let err = cart
            .place_order(&user, Some("missing"), PaymentMethod::Card, TaxRate::CHECKOUT_DEFAULT)
            .unwrap_err();
        assert!(matches!(err, CoreError::AddressNotFound(_)));
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cart = CartStore::new(catalog(), PersistHandle::detached());
        let screen = cart.clone();
        screen.add_by_id("5", 1, None, None).unwrap();
        assert_eq!(cart.item_count(), 1);
    }
}
