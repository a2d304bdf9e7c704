use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::domain::order::DispatchableEvent;
use crate::metrics::OrderMetrics;
use crate::ports::EventDispatcher;
use crate::utils::{retry_on_transient, IsTransient, RetryConfig, RetryResult};

// ============================================================================
// Event Dispatch Adapters
// ============================================================================
//
// - InMemoryOutbox:          records every event, never fails
// - EventSink:               fallible transport (channel, broker, ...)
// - RetryingEventDispatcher: EventDispatcher over a sink, with backoff.
//                            Events it gives up on are logged, counted and
//                            kept for inspection.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryOutbox {
    events: Mutex<Vec<DispatchableEvent>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<DispatchableEvent> {
        self.events.lock().await.clone()
    }

    /// Remove and return everything recorded so far
    pub async fn drain(&self) -> Vec<DispatchableEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventDispatcher for InMemoryOutbox {
    async fn dispatch(&self, event: DispatchableEvent) {
        tracing::debug!(order_id = %event.order_id(), event_type = %event.event_type, "Event added to outbox");
        self.events.lock().await.push(event);
    }
}

// ----------------------------------------------------------------------------
// Sinks
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Sink temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Sink closed")]
    Closed,
}

impl IsTransient for SinkError {
    fn is_transient(&self) -> bool {
        matches!(self, SinkError::Unavailable(_))
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &DispatchableEvent) -> Result<(), SinkError>;
}

/// Sink backed by a bounded tokio channel
pub struct ChannelEventSink {
    sender: mpsc::Sender<DispatchableEvent>,
}

impl ChannelEventSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DispatchableEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn publish(&self, event: &DispatchableEvent) -> Result<(), SinkError> {
        match self.sender.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SinkError::Unavailable("channel full".to_string())),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SinkError::Closed),
        }
    }
}

// ----------------------------------------------------------------------------
// Retrying dispatcher
// ----------------------------------------------------------------------------

pub struct RetryingEventDispatcher<S: EventSink> {
    sink: S,
    config: RetryConfig,
    undelivered: Mutex<Vec<DispatchableEvent>>,
    metrics: Option<Arc<OrderMetrics>>,
}

impl<S: EventSink> RetryingEventDispatcher<S> {
    pub fn new(sink: S, config: RetryConfig) -> Self {
        Self {
            sink,
            config,
            undelivered: Mutex::new(Vec::new()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<OrderMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Events that could not be delivered
    pub async fn undelivered(&self) -> Vec<DispatchableEvent> {
        self.undelivered.lock().await.clone()
    }
}

#[async_trait]
impl<S: EventSink> EventDispatcher for RetryingEventDispatcher<S> {
    async fn dispatch(&self, event: DispatchableEvent) {
        let result = retry_on_transient("dispatch_event", &self.config, |_attempt| self.sink.publish(&event)).await;

        let error = match result {
            RetryResult::Success(()) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_dispatch(event.event_type);
                }
                return;
            }
            RetryResult::Failed(e) | RetryResult::PermanentFailure(e) => e,
        };

        tracing::error!(
            order_id = %event.order_id(),
            event_id = %event.event_id,
            event_type = %event.event_type,
            error = %error,
            "Giving up on event delivery"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_dispatch_failure(event.event_type);
        }
        self.undelivered.lock().await.push(event);
    }
}
