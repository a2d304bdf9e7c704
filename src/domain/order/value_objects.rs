use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ProductId, ProductVersionId};

// ============================================================================
// Order Value Objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Line item as requested by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl Item {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self { product_id, quantity }
    }

    pub fn versioned(&self, product_version_id: ProductVersionId) -> VersionedItem {
        VersionedItem {
            product_id: self.product_id,
            quantity: self.quantity,
            product_version_id,
        }
    }
}

/// Line item bound to the product version current at placement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product_version_id: ProductVersionId,
}
