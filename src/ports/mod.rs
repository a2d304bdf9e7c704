use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::domain::identifiers::{CustomerId, OrderId, ProductId, ProductVersionId};
use crate::domain::order::{DispatchableEvent, PersistedOrder, Status, StatusTransition, VersionedOrder};

// ============================================================================
// Ports - capabilities the services consume
// ============================================================================
//
// Services hold these as `Arc<dyn Port>`. Any blocking or network I/O happens
// behind them; the services await each call before taking the next step.
//
// ============================================================================

/// Failure of a persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to save order: {0}")]
    Save(String),

    #[error("Failed to update order: {0}")]
    Update(String),

    #[error("Failed to read: {0}")]
    Read(String),

    #[error("Concurrent update of order {order_id}: expected {expected}, found {actual}")]
    Conflict {
        order_id: OrderId,
        expected: Status,
        actual: Status,
    },
}

/// Outcome of resolving product ids against the catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductVersionResolution {
    /// Valid products with a current version
    pub versions: HashMap<ProductId, ProductVersionId>,
    /// Ids that are not products at all
    pub invalid_ids: HashSet<ProductId>,
    /// Valid products with no current version
    pub unversioned_ids: HashSet<ProductId>,
}

#[async_trait]
pub trait ProductVersionResolver: Send + Sync {
    async fn resolve(&self, product_ids: &[ProductId]) -> Result<ProductVersionResolution, PersistenceError>;
}

#[async_trait]
pub trait OrderPersister: Send + Sync {
    /// Persist a new order. The implementation assigns the id.
    async fn save(&self, order: VersionedOrder) -> Result<PersistedOrder, PersistenceError>;
}

#[async_trait]
pub trait OrderReader: Send + Sync {
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, PersistenceError>;
}

#[async_trait]
pub trait CustomerOrdersReader: Send + Sync {
    async fn get_by_customer_id(&self, customer_id: CustomerId) -> Result<Vec<PersistedOrder>, PersistenceError>;
}

#[async_trait]
pub trait OrderStatusUpdater: Send + Sync {
    /// Store `transition.to_status()` for the order. The transition's
    /// from-status lets implementations compare-and-swap.
    async fn update_status(&self, order_id: OrderId, transition: &StatusTransition) -> Result<(), PersistenceError>;
}

#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Delivery failures are the dispatcher's own concern
    async fn dispatch(&self, event: DispatchableEvent);
}
