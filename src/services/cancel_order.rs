use std::sync::Arc;

use crate::domain::identifiers::OrderId;
use crate::domain::order::{ExpectednessSetting, OrderError, PersistedOrder, Status};
use super::update_order_status::UpdateOrderStatusService;

// ============================================================================
// Cancel Order Service
// ============================================================================
//
// Cancellation is a status update to CANCELLED. From any live status that
// transition is UNEXPECTED, so it is allowed without forcing; leaving a
// terminal status is ABNORMAL and needs `force`.
//
// ============================================================================

pub struct CancelOrderService {
    updater: Arc<UpdateOrderStatusService>,
}

impl CancelOrderService {
    pub fn new(updater: Arc<UpdateOrderStatusService>) -> Self {
        Self { updater }
    }

    pub async fn cancel_order(&self, order_id: OrderId, force: bool) -> Result<PersistedOrder, OrderError> {
        let setting = if force {
            ExpectednessSetting::AllowAbnormal
        } else {
            ExpectednessSetting::AllowUnexpected
        };

        tracing::info!(order_id = %order_id, force, "Cancelling order");

        match self.updater.update_order_status_with(order_id, Status::Cancelled, setting).await {
            Err(OrderError::InsufficientExpectedness { from, .. }) => {
                tracing::warn!(order_id = %order_id, status = %from, "Order can no longer be cancelled");
                Err(OrderError::NoLongerCancelable(order_id))
            }
            other => other,
        }
    }
}
