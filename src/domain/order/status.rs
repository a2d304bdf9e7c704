use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    AcceptedByInventory,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl Status {
    /// Every status, in matrix index order
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::AcceptedByInventory,
        Status::Paid,
        Status::Shipped,
        Status::Delivered,
        Status::Cancelled,
    ];

    /// Row/column of this status in the expectedness matrix.
    /// Not a business ordering.
    pub const fn index(self) -> usize {
        match self {
            Status::Pending => 0,
            Status::AcceptedByInventory => 1,
            Status::Paid => 2,
            Status::Shipped => 3,
            Status::Delivered => 4,
            Status::Cancelled => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::AcceptedByInventory => "ACCEPTED_BY_INVENTORY",
            Status::Paid => "PAID",
            Status::Shipped => "SHIPPED",
            Status::Delivered => "DELIVERED",
            Status::Cancelled => "CANCELLED",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Status::Pending => "Order has been validated and is ready to be reviewed by inventory.",
            Status::AcceptedByInventory => "Order has been accepted by inventory and is ready to be paid.",
            Status::Paid => "Order has been paid and is ready to be shipped.",
            Status::Shipped => "Order has been shipped.",
            Status::Delivered => "Order has been delivered.",
            Status::Cancelled => "Order has been cancelled.",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Delivered | Status::Cancelled)
    }

    /// The single status one step ahead on the happy path, if any
    pub fn nominal_next(self) -> Option<Status> {
        Status::ALL
            .into_iter()
            .find(|to| MatrixClassifier.classify(self, *to) == Expectedness::NextUp)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// ============================================================================
// Expectedness - how safe a transition is
// ============================================================================

/// Ordered from least to most safe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expectedness {
    Abnormal,
    Unexpected,
    Foreseen,
    NextUp,
}

impl Expectedness {
    const fn from_key(key: u8) -> Self {
        match key {
            0 => Expectedness::Abnormal,
            1 => Expectedness::Unexpected,
            2 => Expectedness::Foreseen,
            _ => Expectedness::NextUp,
        }
    }
}

// ============================================================================
// Transition Classifier
// ============================================================================

/// Classifies an ordered pair of statuses
pub trait TransitionClassifier: Send + Sync {
    fn classify(&self, from: Status, to: Status) -> Expectedness;
}

/// Row = from-status, column = to-status, both by `Status::index`.
/// 0 = ABNORMAL, 1 = UNEXPECTED, 2 = FORESEEN, 3 = NEXT_UP
const EXPECTEDNESS_MATRIX: [[u8; 6]; 6] = [
    // PEND ACC PAID SHIP DEL CANC
    [0, 3, 2, 2, 2, 1], // PENDING
    [1, 0, 3, 2, 2, 1], // ACCEPTED_BY_INVENTORY
    [0, 0, 0, 3, 2, 1], // PAID
    [0, 0, 0, 0, 3, 1], // SHIPPED
    [0, 0, 0, 0, 0, 0], // DELIVERED
    [0, 0, 0, 0, 0, 0], // CANCELLED
];

/// Stateless classifier backed by the fixed expectedness matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixClassifier;

impl TransitionClassifier for MatrixClassifier {
    fn classify(&self, from: Status, to: Status) -> Expectedness {
        Expectedness::from_key(EXPECTEDNESS_MATRIX[from.index()][to.index()])
    }
}
