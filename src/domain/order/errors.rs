use crate::domain::identifiers::{OrderId, ProductId, ProductVersionId};
use crate::ports::PersistenceError;

use super::status::{Expectedness, Status};
use super::transition::ExpectednessSetting;

// ============================================================================
// Order Errors
// ============================================================================

/// Broad category of an [`OrderError`], for callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced entity does not exist
    Lookup,
    /// The entity exists but the operation breaks a business rule
    Policy,
    /// The request itself is malformed
    Validation,
    /// A collaborator failed
    Dependency,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    InvalidOrderId(OrderId),

    #[error("Product not found: {0}")]
    InvalidProductId(ProductId),

    #[error("Product version not found: {0}")]
    InvalidProductVersionId(ProductVersionId),

    #[error("Product {0} has no current product version")]
    NoCurrentProductVersion(ProductId),

    #[error("Transition {from} -> {to} of order {order_id} is {expectedness:?}, rejected under {setting}")]
    InsufficientExpectedness {
        order_id: OrderId,
        from: Status,
        to: Status,
        expectedness: Expectedness,
        setting: ExpectednessSetting,
    },

    #[error("Order {0} can no longer be cancelled without forcing")]
    NoLongerCancelable(OrderId),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity for product {0}")]
    InvalidQuantity(ProductId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidOrderId(_)
            | OrderError::InvalidProductId(_)
            | OrderError::InvalidProductVersionId(_) => ErrorKind::Lookup,
            OrderError::NoCurrentProductVersion(_)
            | OrderError::InsufficientExpectedness { .. }
            | OrderError::NoLongerCancelable(_) => ErrorKind::Policy,
            OrderError::EmptyItems | OrderError::InvalidQuantity(_) => ErrorKind::Validation,
            OrderError::Persistence(_) => ErrorKind::Dependency,
        }
    }

    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::InvalidOrderId(_) => "invalid_order_id",
            OrderError::InvalidProductId(_) => "invalid_product_id",
            OrderError::InvalidProductVersionId(_) => "invalid_product_version_id",
            OrderError::NoCurrentProductVersion(_) => "no_current_product_version",
            OrderError::InsufficientExpectedness { .. } => "insufficient_expectedness",
            OrderError::NoLongerCancelable(_) => "no_longer_cancelable",
            OrderError::EmptyItems => "empty_items",
            OrderError::InvalidQuantity(_) => "invalid_quantity",
            OrderError::Persistence(_) => "persistence",
        }
    }
}
