use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::identifiers::{CustomerId, OrderId};
use crate::domain::order::{PersistedOrder, StatusTransition, VersionedOrder};
use crate::ports::{CustomerOrdersReader, OrderPersister, OrderReader, OrderStatusUpdater, PersistenceError};

// ============================================================================
// In-Memory Order Store
// ============================================================================
//
// Status writes compare-and-swap on the stored status: a write whose
// from-status no longer matches fails with `PersistenceError::Conflict`.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, PersistedOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderPersister for InMemoryOrderStore {
    async fn save(&self, order: VersionedOrder) -> Result<PersistedOrder, PersistenceError> {
        let persisted = order.into_persisted(OrderId::new());
        self.orders.write().await.insert(persisted.id(), persisted.clone());

        tracing::debug!(order_id = %persisted.id(), "Saved order");
        Ok(persisted)
    }
}

#[async_trait]
impl OrderReader for InMemoryOrderStore {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, PersistenceError> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }
}

#[async_trait]
impl CustomerOrdersReader for InMemoryOrderStore {
    async fn get_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<PersistedOrder>, PersistenceError> {
        let mut orders: Vec<_> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.customer_id() == customer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.id());
        Ok(orders)
    }
}

#[async_trait]
impl OrderStatusUpdater for InMemoryOrderStore {
    async fn update_status(&self, order_id: OrderId, transition: &StatusTransition) -> Result<(), PersistenceError> {
        let mut orders = self.orders.write().await;

        let current = orders
            .get(&order_id)
            .ok_or_else(|| PersistenceError::Update(format!("order {} does not exist", order_id)))?;

        if current.status() != transition.from_status() {
            tracing::warn!(
                order_id = %order_id,
                expected = %transition.from_status(),
                actual = %current.status(),
                "Status changed concurrently"
            );
            return Err(PersistenceError::Conflict {
                order_id,
                expected: transition.from_status(),
                actual: current.status(),
            });
        }

        let updated = current.with_status(transition.to_status());
        orders.insert(order_id, updated);
        Ok(())
    }
}
