use std::sync::Arc;

use crate::adapters::{ChannelEventSink, InMemoryOrderStore, InMemoryProductCatalogue, RetryingEventDispatcher};
use crate::config::OrderLifecycleConfig;
use crate::domain::order::DispatchableEvent;
use crate::metrics::OrderMetrics;
use crate::ports::EventDispatcher;
use crate::services::{CancelOrderService, GetOrderService, PlaceOrderService, UpdateOrderStatusService};

// ============================================================================
// Composition Root
// ============================================================================
//
// Builds every service once and shares the collaborators between them.
//
// ============================================================================

pub struct OrderLifecycle {
    pub place_order: PlaceOrderService,
    pub update_status: Arc<UpdateOrderStatusService>,
    pub cancel_order: CancelOrderService,
    pub get_order: GetOrderService,
    pub catalogue: Arc<InMemoryProductCatalogue>,
    pub orders: Arc<InMemoryOrderStore>,
    pub metrics: Arc<OrderMetrics>,
}

impl OrderLifecycle {
    /// Wire the services against in-memory stores. Dispatched events are
    /// delivered to the returned receiver.
    pub fn in_memory(
        config: &OrderLifecycleConfig,
        event_buffer: usize,
    ) -> anyhow::Result<(Self, tokio::sync::mpsc::Receiver<DispatchableEvent>)> {
        let metrics = Arc::new(OrderMetrics::new()?);
        let catalogue = Arc::new(InMemoryProductCatalogue::new());
        let orders = Arc::new(InMemoryOrderStore::new());

        let (sink, receiver) = ChannelEventSink::new(event_buffer);
        let dispatcher: Arc<dyn EventDispatcher> = Arc::new(
            RetryingEventDispatcher::new(sink, config.dispatch_retry.clone()).with_metrics(metrics.clone()),
        );

        let place_order = PlaceOrderService::new(catalogue.clone(), orders.clone(), dispatcher.clone())
            .with_metrics(metrics.clone());

        let update_status = Arc::new(
            UpdateOrderStatusService::new(orders.clone(), orders.clone(), dispatcher)
                .with_default_setting(config.default_setting)
                .with_metrics(metrics.clone()),
        );

        let cancel_order = CancelOrderService::new(update_status.clone());
        let get_order = GetOrderService::new(orders.clone(), orders.clone());

        tracing::info!(default_setting = %config.default_setting, "Order lifecycle services ready");

        Ok((
            Self {
                place_order,
                update_status,
                cancel_order,
                get_order,
                catalogue,
                orders,
                metrics,
            },
            receiver,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::{CustomerId, ProductId, ProductVersionId};
    use crate::domain::order::{EventType, Item, OrderError, RequestedOrder, Status};
    use crate::domain::product::{Price, Product, ProductVersion};
    use crate::testing::create_test_address;
    use rust_decimal::Decimal;

    async fn stock_product(lifecycle: &OrderLifecycle) -> ProductId {
        let product_id = ProductId::new();
        let version = ProductVersion {
            id: ProductVersionId::new(),
            product_id,
            name: "Desk lamp".to_string(),
            description: "Brass, 40W".to_string(),
            price: Price {
                amount: Decimal::new(4999, 2),
                unit: "piece".to_string(),
                currency: "GBP".to_string(),
            },
        };
        lifecycle.catalogue.add_product(Product::new(product_id)).await;
        lifecycle.catalogue.add_product_version(version.clone()).await.unwrap();
        lifecycle.catalogue.set_current_version(product_id, version.id).await.unwrap();
        product_id
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (lifecycle, mut events) = OrderLifecycle::in_memory(&OrderLifecycleConfig::default(), 16).unwrap();
        let product_id = stock_product(&lifecycle).await;
        let customer_id = CustomerId::new();

        let requested = RequestedOrder::new(customer_id, create_test_address(), vec![Item::new(product_id, 2)]).unwrap();
        let order = lifecycle.place_order.place_order(&requested).await.unwrap();
        assert_eq!(events.recv().await.unwrap().event_type, EventType::OrderToBeAcceptedByInventory);

        for (status, event_type) in [
            (Status::AcceptedByInventory, Some(EventType::OrderToBePaid)),
            (Status::Paid, Some(EventType::OrderToBeShipped)),
            (Status::Shipped, Some(EventType::OrderShipped)),
            (Status::Delivered, None),
        ] {
            let updated = lifecycle.update_status.update_order_status(order.id(), status).await.unwrap();
            assert_eq!(updated.status(), status);
            if let Some(expected) = event_type {
                assert_eq!(events.recv().await.unwrap().event_type, expected);
            }
        }
        assert!(events.try_recv().is_err());

        let stored = lifecycle.get_order.get_order(order.id()).await.unwrap();
        assert_eq!(stored.status(), Status::Delivered);

        let err = lifecycle.cancel_order.cancel_order(order.id(), false).await.unwrap_err();
        assert!(matches!(err, OrderError::NoLongerCancelable(_)));

        let customer_orders = lifecycle.get_order.get_orders_by_customer(customer_id).await.unwrap();
        assert_eq!(customer_orders.len(), 1);
        assert_eq!(lifecycle.metrics.orders_placed.get(), 1);
    }
}
