use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ProductId, ProductVersionId};

// ============================================================================
// Product Catalogue Models
// ============================================================================
//
// A product points at most at one current version. Versions are immutable;
// orders bind to the version that was current when they were placed.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: Decimal,
    pub unit: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVersion {
    pub id: ProductVersionId,
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub current_version_id: Option<ProductVersionId>,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            current_version_id: None,
        }
    }
}
