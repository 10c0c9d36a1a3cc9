//! # Storefront Context
//!
//! Wires every store to one persistence writer and rehydrates them in a
//! single pass. Whatever hosts the storefront holds one of these and hands
//! clones of the individual stores to its screens.
//!
//! ```text
//!   open(kv, config, catalog)
//!     │
//!     ├── PersistHandle::spawn(kv) ── every later mutation writes through here
//!     ├── CartStore::rehydrate     (cart-storage)
//!     ├── SessionStore::rehydrate  (auth-storage)
//!     ├── ThemeStore::rehydrate    (theme-storage)
//!     └── OrderStore::rehydrate    (orders-storage)
//! ```

use std::sync::Arc;

use tracing::info;

use storefront_core::{Catalog, CoreError, CoreResult, Order, PaymentMethod, TaxRate};
use storefront_db::{KeyValueStore, LoadStatus};

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::error::StateResult;
use crate::orders::OrderStore;
use crate::persist::PersistHandle;
use crate::session::SessionStore;
use crate::theme::{ColorSchemeSource, EnvColorScheme, FixedColorScheme, ThemeStore};

/// Which branch each store's rehydration took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RehydrateReport {
    pub cart: LoadStatus,
    pub session: LoadStatus,
    pub theme: LoadStatus,
    pub orders: LoadStatus,
}

impl RehydrateReport {
    /// `true` if any record existed but could not be used.
    pub fn any_fallback(&self) -> bool {
        [self.cart, self.session, self.theme, self.orders].contains(&LoadStatus::Fallback)
    }
}

#[derive(Debug, Clone)]
pub struct Storefront {
    pub catalog: Arc<Catalog>,
    pub cart: CartStore,
    pub session: SessionStore,
    pub theme: ThemeStore,
    pub orders: OrderStore,
    persist: PersistHandle,
    tax_rate: TaxRate,
}

impl Storefront {
    /// Rehydrates every store from `kv` and starts the writer on it.
    pub async fn open<S>(
        kv: S,
        config: &StorefrontConfig,
        catalog: Catalog,
    ) -> (Self, RehydrateReport)
    where
        S: KeyValueStore + Clone + 'static,
    {
        let persist = PersistHandle::spawn(kv.clone());
        let catalog = Arc::new(catalog);

        let (cart, cart_status) =
            CartStore::rehydrate(&kv, catalog.clone(), persist.clone()).await;
        let (session, session_status) =
            SessionStore::rehydrate(&kv, persist.clone(), config.auth_latency()).await;
        let (theme, theme_status) =
            ThemeStore::rehydrate(&kv, host_color_scheme(config), persist.clone()).await;
        let (orders, orders_status) = OrderStore::rehydrate(&kv, persist.clone()).await;

        let report = RehydrateReport {
            cart: cart_status,
            session: session_status,
            theme: theme_status,
            orders: orders_status,
        };
        info!(?report, "Storefront state ready");

        let storefront = Storefront {
            catalog,
            cart,
            session,
            theme,
            orders,
            persist,
            tax_rate: config.tax_rate(),
        };
        (storefront, report)
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Places an order for the signed-in user and records it in history.
    pub fn checkout(&self, address_id: Option<&str>, payment: PaymentMethod) -> CoreResult<Order> {
        let user = self.session.user().ok_or(CoreError::NotAuthenticated)?;
        let order = self
            .cart
            .place_order(&user, address_id, payment, self.tax_rate)?;
        self.orders.record(order.clone());
        Ok(order)
    }

    /// Waits until every mutation so far is on disk.
    pub async fn flush(&self) -> StateResult<()> {
        self.persist.flush().await
    }

    /// Drains pending writes and stops the writer.
    pub async fn shutdown(&self) -> StateResult<()> {
        self.persist.shutdown().await
    }
}

/// The configured host scheme if pinned, else the environment on each read.
pub fn host_color_scheme(config: &StorefrontConfig) -> Arc<dyn ColorSchemeSource> {
    match config.theme.host_scheme {
        Some(scheme) => Arc::new(FixedColorScheme(scheme)),
        None => Arc::new(EnvColorScheme),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Cart, ColorScheme, ThemePreference};
    use storefront_db::{snapshot, MemoryStore};

    use crate::config::ENV_COLOR_SCHEME;
    use crate::CART_STORAGE_KEY;

    fn config() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.auth.simulated_latency_ms = 0;
        config.theme.host_scheme = Some(ColorScheme::Dark);
        config
    }

    #[tokio::test]
    async fn test_fresh_open_starts_empty() {
        let (storefront, report) =
            Storefront::open(MemoryStore::new(), &config(), Catalog::demo()).await;

        assert_eq!(report.cart, LoadStatus::Missing);
        assert!(!report.any_fallback());
        assert!(storefront.cart.is_empty());
        assert!(!storefront.session.is_authenticated());
        assert_eq!(storefront.theme.effective_mode(), ColorScheme::Dark);
    }

    #[tokio::test]
    async fn test_checkout_requires_session() {
        let (storefront, _) =
            Storefront::open(MemoryStore::new(), &config(), Catalog::demo()).await;
        storefront.cart.add_by_id("1", 1, None, None).unwrap();

        let err = storefront.checkout(None, PaymentMethod::Card).unwrap_err();
        assert!(matches!(err, CoreError::NotAuthenticated));
        assert_eq!(storefront.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let kv = MemoryStore::new();
        let (first, _) = Storefront::open(kv.clone(), &config(), Catalog::demo()).await;

        assert!(first.session.login("a@b.com", "pw").await);
        first.cart.add_by_id("2", 2, None, None).unwrap();
        first.theme.set_theme(ThemePreference::Light);
        let order = first.checkout(None, PaymentMethod::PayPal).unwrap();
        first.cart.add_by_id("4", 3, Some("red".into()), None).unwrap();
        first.shutdown().await.unwrap();

        let (second, report) = Storefront::open(kv, &config(), Catalog::demo()).await;
        assert_eq!(report.cart, LoadStatus::Restored);
        assert_eq!(report.session, LoadStatus::Restored);
        assert_eq!(second.cart.item_count(), 3);
        assert!(second.session.is_authenticated());
        assert_eq!(second.theme.effective_mode(), ColorScheme::Light);
        assert_eq!(second.orders.list(), vec![order]);
    }

    #[tokio::test]
    async fn test_flush_makes_mutations_durable() {
        let kv = MemoryStore::new();
        let (storefront, _) = Storefront::open(kv.clone(), &config(), Catalog::demo()).await;
        storefront.cart.add_by_id("3", 2, None, None).unwrap();
        storefront.flush().await.unwrap();

        let saved: Cart = snapshot::load(&kv, CART_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(saved.item_count(), 2);

        // The writer keeps running after a flush.
        storefront.cart.clear();
        storefront.flush().await.unwrap();
        let saved: Cart = snapshot::load(&kv, CART_STORAGE_KEY).await.unwrap().unwrap();
        assert!(saved.is_empty());
    }

    #[tokio::test]
    async fn test_system_theme_follows_env_after_open() {
        std::env::set_var(ENV_COLOR_SCHEME, "dark");

        let mut config = StorefrontConfig::default();
        config.apply_env_overrides(|name| std::env::var(name).ok());
        assert_eq!(config.theme.host_scheme, None);

        let (storefront, _) = Storefront::open(MemoryStore::new(), &config, Catalog::demo()).await;
        assert_eq!(storefront.theme.effective_mode(), ColorScheme::Dark);

        std::env::set_var(ENV_COLOR_SCHEME, "light");
        assert_eq!(storefront.theme.effective_mode(), ColorScheme::Light);

        std::env::remove_var(ENV_COLOR_SCHEME);
    }
}
