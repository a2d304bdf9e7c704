use std::sync::Arc;

use crate::domain::order::{OrderError, PersistedOrder, RequestedOrder, StatusEventMapper, VersionedOrder};
use crate::metrics::OrderMetrics;
use crate::ports::{EventDispatcher, OrderPersister, ProductVersionResolver};

// ============================================================================
// Place Order Service
// ============================================================================
//
// Orchestrates: resolve product versions -> persist -> dispatch initial event
//
// ============================================================================

pub struct PlaceOrderService {
    resolver: Arc<dyn ProductVersionResolver>,
    persister: Arc<dyn OrderPersister>,
    dispatcher: Arc<dyn EventDispatcher>,
    mapper: StatusEventMapper,
    metrics: Option<Arc<OrderMetrics>>,
}

impl PlaceOrderService {
    pub fn new(
        resolver: Arc<dyn ProductVersionResolver>,
        persister: Arc<dyn OrderPersister>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            resolver,
            persister,
            dispatcher,
            mapper: StatusEventMapper,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<OrderMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Place a new order. Nothing is persisted or dispatched unless every
    /// product resolves to a current version.
    pub async fn place_order(&self, requested_order: &RequestedOrder) -> Result<PersistedOrder, OrderError> {
        let result = self.try_place_order(requested_order).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_placement(result.as_ref().err().map(OrderError::reason));
        }
        result
    }

    async fn try_place_order(&self, requested_order: &RequestedOrder) -> Result<PersistedOrder, OrderError> {
        tracing::debug!(
            customer_id = %requested_order.customer_id(),
            item_count = requested_order.items().len(),
            "Placing order"
        );

        let versioned_order = self.version_order(requested_order).await?;

        let persisted_order = self.persister.save(versioned_order).await.map_err(|e| {
            tracing::error!(customer_id = %requested_order.customer_id(), error = %e, "Failed to save order");
            OrderError::from(e)
        })?;

        tracing::info!(
            order_id = %persisted_order.id(),
            customer_id = %persisted_order.customer_id(),
            status = %persisted_order.status(),
            "Order placed"
        );

        if let Some(event) = self.mapper.event_for(&persisted_order) {
            let event_type = event.event_type;
            self.dispatcher.dispatch(event).await;
            tracing::info!(order_id = %persisted_order.id(), event_type = %event_type, "Dispatched order event");
        }

        Ok(persisted_order)
    }

    /// Invalid product ids take priority over missing versions. Within each
    /// class, the first offending item in request order is reported.
    async fn version_order(&self, requested_order: &RequestedOrder) -> Result<VersionedOrder, OrderError> {
        let product_ids = requested_order.product_ids();
        let resolution = self.resolver.resolve(&product_ids).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to resolve product versions");
            OrderError::from(e)
        })?;

        if let Some(invalid) = product_ids.iter().find(|id| resolution.invalid_ids.contains(id)) {
            tracing::warn!(product_id = %invalid, "Order references unknown product");
            return Err(OrderError::InvalidProductId(*invalid));
        }

        if let Some(unversioned) = product_ids.iter().find(|id| resolution.unversioned_ids.contains(id)) {
            tracing::warn!(product_id = %unversioned, "Product has no current version");
            return Err(OrderError::NoCurrentProductVersion(*unversioned));
        }

        requested_order.to_versioned_order(&resolution.versions)
    }
}
