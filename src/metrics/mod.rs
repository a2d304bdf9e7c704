use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::order::{EventType, Status};

// ============================================================================
// Metrics Module - Prometheus metrics for the order lifecycle
// ============================================================================
//
// Provides metrics for:
// - Order placement (successes, failures by reason)
// - Status transitions (by from/to status and outcome)
// - Event dispatch (by event type, delivery failures)
//
// Exposition is left to the host process; `encode_text` renders the registry.
// ============================================================================

pub struct OrderMetrics {
    registry: Registry,

    // Placement
    pub orders_placed: IntCounter,
    pub order_placement_failures: IntCounterVec,

    // Transitions
    pub status_transitions: IntCounterVec,

    // Dispatch
    pub events_dispatched: IntCounterVec,
    pub event_dispatch_failures: IntCounterVec,
}

impl OrderMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new("orders_placed_total", "Total orders placed")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let order_placement_failures = IntCounterVec::new(
            Opts::new("order_placement_failures_total", "Order placements that failed"),
            &["reason"],
        )?;
        registry.register(Box::new(order_placement_failures.clone()))?;

        let status_transitions = IntCounterVec::new(
            Opts::new("status_transitions_total", "Requested order status transitions"),
            &["from", "to", "outcome"],
        )?;
        registry.register(Box::new(status_transitions.clone()))?;

        let events_dispatched = IntCounterVec::new(
            Opts::new("events_dispatched_total", "Events delivered to the sink"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_dispatched.clone()))?;

        let event_dispatch_failures = IntCounterVec::new(
            Opts::new("event_dispatch_failures_total", "Events the dispatcher gave up on"),
            &["event_type"],
        )?;
        registry.register(Box::new(event_dispatch_failures.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            order_placement_failures,
            status_transitions,
            events_dispatched,
            event_dispatch_failures,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode_text(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn record_placement(&self, failure_reason: Option<&str>) {
        match failure_reason {
            None => self.orders_placed.inc(),
            Some(reason) => self.order_placement_failures.with_label_values(&[reason]).inc(),
        }
    }

    pub fn record_transition(&self, from: Status, to: Status, outcome: &str) {
        self.status_transitions
            .with_label_values(&[from.as_str(), to.as_str(), outcome])
            .inc();
    }

    /// Counted by the dispatcher adapter once the sink has accepted the event
    pub fn record_dispatch(&self, event_type: EventType) {
        self.events_dispatched.with_label_values(&[event_type.as_str()]).inc();
    }

    pub fn record_dispatch_failure(&self, event_type: EventType) {
        self.event_dispatch_failures.with_label_values(&[event_type.as_str()]).inc();
    }
}
