use std::sync::Arc;

use crate::domain::identifiers::{CustomerId, OrderId};
use crate::domain::order::{OrderError, PersistedOrder};
use crate::ports::{CustomerOrdersReader, OrderReader};

// ============================================================================
// Get Order Service - read side
// ============================================================================

pub struct GetOrderService {
    reader: Arc<dyn OrderReader>,
    customer_reader: Arc<dyn CustomerOrdersReader>,
}

impl GetOrderService {
    pub fn new(reader: Arc<dyn OrderReader>, customer_reader: Arc<dyn CustomerOrdersReader>) -> Self {
        Self {
            reader,
            customer_reader,
        }
    }

    pub async fn get_order(&self, order_id: OrderId) -> Result<PersistedOrder, OrderError> {
        self.reader
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::InvalidOrderId(order_id))
    }

    /// All orders of a customer; empty when there are none
    pub async fn get_orders_by_customer(&self, customer_id: CustomerId) -> Result<Vec<PersistedOrder>, OrderError> {
        let orders = self.customer_reader.get_by_customer_id(customer_id).await?;
        tracing::debug!(customer_id = %customer_id, count = orders.len(), "Loaded customer orders");
        Ok(orders)
    }
}
