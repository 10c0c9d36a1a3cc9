//! # Order History
//!
//! Orders placed from this device, newest first, persisted under
//! `orders-storage`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use storefront_core::Order;
use storefront_db::{snapshot, KeyValueStore, LoadStatus};

use crate::persist::PersistHandle;
use crate::ORDERS_STORAGE_KEY;

/// Persisted shape: `{ "orders": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHistory {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone)]
pub struct OrderStore {
    history: Arc<Mutex<OrderHistory>>,
    persist: PersistHandle,
}

impl OrderStore {
    pub fn new(persist: PersistHandle) -> Self {
        OrderStore::from_history(OrderHistory::default(), persist)
    }

    fn from_history(history: OrderHistory, persist: PersistHandle) -> Self {
        OrderStore {
            history: Arc::new(Mutex::new(history)),
            persist,
        }
    }

    pub async fn rehydrate<S: KeyValueStore>(store: &S, persist: PersistHandle) -> (Self, LoadStatus) {
        let (history, status) =
            snapshot::load_or_default::<OrderHistory, _>(store, ORDERS_STORAGE_KEY)
                .await
                .resolve();
        info!(?status, orders = history.orders.len(), "Order history rehydrated");
        (OrderStore::from_history(history, persist), status)
    }

    fn lock(&self) -> MutexGuard<'_, OrderHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a placed order at the front of the history.
    pub fn record(&self, order: Order) {
        let mut history = self.lock();
        debug!(order_id = %order.id, total = %order.total, "Recording order");
        history.orders.insert(0, order);
        self.persist.write(ORDERS_STORAGE_KEY, &*history);
    }

    /// Newest first.
    pub fn list(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().orders.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
