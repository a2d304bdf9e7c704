// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory. Identifiers are shared.
//
// This layer is completely separate from ports, services and adapters.
//
// ============================================================================

pub mod identifiers;
pub mod order;
pub mod product;

pub use identifiers::*;
