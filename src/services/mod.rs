// ============================================================================
// Services - the entry points of the order lifecycle
// ============================================================================
//
// Each service depends only on ports (crate::ports) and the pure domain.
// Collaborator calls are awaited one at a time, in a fixed order.
//
// ============================================================================

mod place_order;
mod update_order_status;
mod cancel_order;
mod get_order;

pub use place_order::PlaceOrderService;
pub use update_order_status::UpdateOrderStatusService;
pub use cancel_order::CancelOrderService;
pub use get_order::GetOrderService;
