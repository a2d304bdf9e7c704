use std::sync::Arc;

use crate::domain::identifiers::OrderId;
use crate::domain::order::{
    ExpectednessSetting, MatrixClassifier, OrderError, PersistedOrder, Status, StatusEventMapper,
    StatusTransition, TransitionClassifier, TransitionValidator,
};
use crate::metrics::OrderMetrics;
use crate::ports::{EventDispatcher, OrderReader, OrderStatusUpdater};

// ============================================================================
// Update Order Status Service
// ============================================================================
//
// Orchestrates: fetch -> classify -> validate -> persist -> snapshot -> dispatch
//
// No lock is taken over the order id. Two concurrent updates may both pass
// validation; the updater sees the from-status and may reject the loser.
//
// ============================================================================

pub struct UpdateOrderStatusService {
    reader: Arc<dyn OrderReader>,
    updater: Arc<dyn OrderStatusUpdater>,
    dispatcher: Arc<dyn EventDispatcher>,
    classifier: Arc<dyn TransitionClassifier>,
    validator: TransitionValidator,
    mapper: StatusEventMapper,
    default_setting: ExpectednessSetting,
    metrics: Option<Arc<OrderMetrics>>,
}

impl UpdateOrderStatusService {
    pub fn new(
        reader: Arc<dyn OrderReader>,
        updater: Arc<dyn OrderStatusUpdater>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            reader,
            updater,
            dispatcher,
            classifier: Arc::new(MatrixClassifier),
            validator: TransitionValidator,
            mapper: StatusEventMapper,
            default_setting: ExpectednessSetting::default(),
            metrics: None,
        }
    }

    pub fn with_default_setting(mut self, setting: ExpectednessSetting) -> Self {
        self.default_setting = setting;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TransitionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<OrderMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn default_setting(&self) -> ExpectednessSetting {
        self.default_setting
    }

    /// Move the order to `new_status` under the default setting
    pub async fn update_order_status(&self, order_id: OrderId, new_status: Status) -> Result<PersistedOrder, OrderError> {
        self.update_order_status_with(order_id, new_status, self.default_setting).await
    }

    pub async fn update_order_status_with(
        &self,
        order_id: OrderId,
        new_status: Status,
        setting: ExpectednessSetting,
    ) -> Result<PersistedOrder, OrderError> {
        let order = self.get_order(order_id).await?;

        let transition = StatusTransition::classified_by(order.status(), new_status, self.classifier.as_ref());

        if !self.validator.validate(&transition, setting) {
            tracing::warn!(
                order_id = %order_id,
                transition = %transition,
                setting = %setting,
                "Rejected status transition"
            );
            self.record_transition(&transition, "rejected");
            return Err(OrderError::InsufficientExpectedness {
                order_id,
                from: transition.from_status(),
                to: transition.to_status(),
                expectedness: transition.expectedness(),
                setting,
            });
        }

        self.updater.update_status(order_id, &transition).await.map_err(|e| {
            tracing::error!(order_id = %order_id, transition = %transition, error = %e, "Failed to persist status");
            self.record_transition(&transition, "failed");
            OrderError::from(e)
        })?;

        let updated_order = order.with_status(new_status);
        self.record_transition(&transition, "accepted");

        tracing::info!(order_id = %order_id, transition = %transition, setting = %setting, "Order status updated");

        if let Some(event) = self.mapper.event_for(&updated_order) {
            let event_type = event.event_type;
            self.dispatcher.dispatch(event).await;
            tracing::info!(order_id = %order_id, event_type = %event_type, "Dispatched order event");
        }

        Ok(updated_order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<PersistedOrder, OrderError> {
        tracing::debug!(order_id = %order_id, "Loading order");

        match self.reader.get_by_id(order_id).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => {
                tracing::warn!(order_id = %order_id, "Order not found");
                Err(OrderError::InvalidOrderId(order_id))
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "Failed to load order");
                Err(e.into())
            }
        }
    }

    fn record_transition(&self, transition: &StatusTransition, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_transition(transition.from_status(), transition.to_status(), outcome);
        }
    }
}
