// ============================================================================
// Test doubles shared by service tests
// ============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::identifiers::{CustomerId, OrderId, ProductId, ProductVersionId};
use crate::domain::order::{
    Address, DispatchableEvent, Item, PersistedOrder, Status, StatusTransition, VersionedOrder,
};
use crate::ports::{
    CustomerOrdersReader, EventDispatcher, OrderPersister, OrderReader, OrderStatusUpdater,
    PersistenceError, ProductVersionResolution, ProductVersionResolver,
};

pub fn create_test_address() -> Address {
    Address {
        street: "221B Baker Street".to_string(),
        city: "London".to_string(),
        postal_code: "NW1 6XE".to_string(),
        country: "UK".to_string(),
    }
}

pub fn create_test_order(status: Status) -> PersistedOrder {
    VersionedOrder::new(
        CustomerId::new(),
        create_test_address(),
        vec![
            Item::new(ProductId::new(), 1).versioned(ProductVersionId::new()),
            Item::new(ProductId::new(), 3).versioned(ProductVersionId::new()),
        ],
    )
    .unwrap()
    .into_persisted(OrderId::new())
    .with_status(status)
}

// ----------------------------------------------------------------------------
// Product version resolver
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct StubResolver {
    resolution: Mutex<ProductVersionResolution>,
    last_request: Mutex<Vec<ProductId>>,
}

impl StubResolver {
    pub fn with_version(&self, product_id: ProductId) -> ProductVersionId {
        let version_id = ProductVersionId::new();
        self.resolution.lock().unwrap().versions.insert(product_id, version_id);
        version_id
    }

    pub fn without_version(&self, product_id: ProductId) {
        self.resolution.lock().unwrap().unversioned_ids.insert(product_id);
    }

    pub fn invalid(&self, product_id: ProductId) {
        self.resolution.lock().unwrap().invalid_ids.insert(product_id);
    }

    pub fn last_request(&self) -> Vec<ProductId> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductVersionResolver for StubResolver {
    async fn resolve(&self, product_ids: &[ProductId]) -> Result<ProductVersionResolution, PersistenceError> {
        *self.last_request.lock().unwrap() = product_ids.to_vec();
        Ok(self.resolution.lock().unwrap().clone())
    }
}

// ----------------------------------------------------------------------------
// Order store
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct SpyOrderStore {
    orders: Mutex<HashMap<OrderId, PersistedOrder>>,
    updates: Mutex<Vec<(OrderId, Status, Status)>>,
    save_calls: AtomicUsize,
    fail_saves: AtomicBool,
    fail_updates: AtomicBool,
}

impl SpyOrderStore {
    pub fn insert(&self, order: PersistedOrder) -> PersistedOrder {
        self.orders.lock().unwrap().insert(order.id(), order.clone());
        order
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// (order id, from, to) of every status write, in call order
    pub fn updates(&self) -> Vec<(OrderId, Status, Status)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderPersister for SpyOrderStore {
    async fn save(&self, order: VersionedOrder) -> Result<PersistedOrder, PersistenceError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Save("injected failure".to_string()));
        }
        Ok(self.insert(order.into_persisted(OrderId::new())))
    }
}

#[async_trait]
impl OrderReader for SpyOrderStore {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, PersistenceError> {
        Ok(self.orders.lock().unwrap().get(&order_id).cloned())
    }
}

#[async_trait]
impl CustomerOrdersReader for SpyOrderStore {
    async fn get_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<PersistedOrder>, PersistenceError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|order| order.customer_id() == customer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderStatusUpdater for SpyOrderStore {
    async fn update_status(&self, order_id: OrderId, transition: &StatusTransition) -> Result<(), PersistenceError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(PersistenceError::Update("injected failure".to_string()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((order_id, transition.from_status(), transition.to_status()));

        let mut orders = self.orders.lock().unwrap();
        if let Some(order) = orders.get(&order_id).cloned() {
            orders.insert(order_id, order.with_status(transition.to_status()));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Event dispatcher
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct SpyDispatcher {
    events: Mutex<Vec<DispatchableEvent>>,
}

impl SpyDispatcher {
    pub fn events(&self) -> Vec<DispatchableEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventDispatcher for SpyDispatcher {
    async fn dispatch(&self, event: DispatchableEvent) {
        self.events.lock().unwrap().push(event);
    }
}
