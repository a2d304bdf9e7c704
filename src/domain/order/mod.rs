// ============================================================================
// Order Domain - status lifecycle of a commerce order
// ============================================================================
//
// This module contains the pure Order-specific code:
// - Value objects (Address, Item, VersionedItem)
// - Status, Expectedness and the transition classifier
// - StatusTransition and the TransitionValidator policy gate
// - Order snapshots (RequestedOrder, VersionedOrder, PersistedOrder)
// - Dispatchable events and the status -> event mapper
// - Errors (OrderError enum)
//
// Nothing here performs I/O; orchestration lives in crate::services.
//
// ============================================================================

pub mod value_objects;
pub mod status;
pub mod transition;
pub mod aggregate;
pub mod events;
pub mod errors;

// Re-export for convenience
pub use value_objects::*;
pub use status::*;
pub use transition::*;
pub use aggregate::*;
pub use events::*;
pub use errors::*;
