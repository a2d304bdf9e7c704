// ============================================================================
// Adapters - in-process implementations of the ports
// ============================================================================
//
// Used by the demo binary and by tests. Durable stores and real brokers
// plug in behind the same traits.
//
// ============================================================================

mod catalogue;
mod dispatch;
mod order_store;

pub use catalogue::InMemoryProductCatalogue;
pub use dispatch::{ChannelEventSink, EventSink, InMemoryOutbox, RetryingEventDispatcher, SinkError};
pub use order_store::InMemoryOrderStore;
