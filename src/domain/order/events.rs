use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::identifiers::OrderId;
use super::aggregate::PersistedOrder;
use super::status::Status;

// ============================================================================
// Dispatchable Events - "this order now needs the next action"
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    OrderToBeAcceptedByInventory,
    OrderToBePaid,
    OrderToBeShipped,
    OrderShipped,
    OrderCancelled,
}

impl EventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventType::OrderToBeAcceptedByInventory => "ORDER_TO_BE_ACCEPTED_BY_INVENTORY",
            EventType::OrderToBePaid => "ORDER_TO_BE_PAID",
            EventType::OrderToBeShipped => "ORDER_TO_BE_SHIPPED",
            EventType::OrderShipped => "ORDER_SHIPPED",
            EventType::OrderCancelled => "ORDER_CANCELLED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event handed to the dispatcher, carrying the order snapshot that caused it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchableEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub order: PersistedOrder,
    pub occurred_at: DateTime<Utc>,
}

impl DispatchableEvent {
    pub fn new(event_type: EventType, order: PersistedOrder) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type,
            order,
            occurred_at: Utc::now(),
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order.id()
    }
}

// ============================================================================
// Status -> Event mapping
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusEventMapper;

impl StatusEventMapper {
    pub fn event_type_for(&self, status: Status) -> Option<EventType> {
        match status {
            Status::Pending => Some(EventType::OrderToBeAcceptedByInventory),
            Status::AcceptedByInventory => Some(EventType::OrderToBePaid),
            Status::Paid => Some(EventType::OrderToBeShipped),
            Status::Shipped => Some(EventType::OrderShipped),
            Status::Cancelled => Some(EventType::OrderCancelled),
            Status::Delivered => None,
        }
    }

    /// Build the event announcing the order's current status, if one exists
    pub fn event_for(&self, order: &PersistedOrder) -> Option<DispatchableEvent> {
        self.event_type_for(order.status())
            .map(|event_type| DispatchableEvent::new(event_type, order.clone()))
    }
}
