use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::identifiers::{CustomerId, OrderId, ProductId, ProductVersionId};
use super::errors::OrderError;
use super::status::Status;
use super::value_objects::{Address, Item, VersionedItem};

// ============================================================================
// Order Lifecycle Snapshots
// ============================================================================
//
// RequestedOrder  -> caller input, never persisted directly
// VersionedOrder  -> product versions bound, still unsaved
// PersistedOrder  -> saved; every status change yields a new snapshot
//
// Fields are private so items cannot change after construction.
// Deserialization goes through the same item checks as `new`.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestedOrderRecord")]
pub struct RequestedOrder {
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<Item>,
}

impl RequestedOrder {
    pub fn new(
        customer_id: CustomerId,
        shipping_address: Address,
        items: Vec<Item>,
    ) -> Result<Self, OrderError> {
        validate_items(items.iter().map(|item| (item.product_id, item.quantity)))?;

        Ok(Self {
            customer_id,
            shipping_address,
            items,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Distinct product ids in first-seen order
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Bind every item to its resolved product version
    pub fn to_versioned_order(
        &self,
        product_versions: &HashMap<ProductId, ProductVersionId>,
    ) -> Result<VersionedOrder, OrderError> {
        let items = self
            .items
            .iter()
            .map(|item| {
                product_versions
                    .get(&item.product_id)
                    .map(|version_id| item.versioned(*version_id))
                    .ok_or(OrderError::NoCurrentProductVersion(item.product_id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        VersionedOrder::new(self.customer_id, self.shipping_address.clone(), items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VersionedOrderRecord")]
pub struct VersionedOrder {
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<VersionedItem>,
}

impl VersionedOrder {
    pub fn new(
        customer_id: CustomerId,
        shipping_address: Address,
        items: Vec<VersionedItem>,
    ) -> Result<Self, OrderError> {
        validate_items(items.iter().map(|item| (item.product_id, item.quantity)))?;

        Ok(Self {
            customer_id,
            shipping_address,
            items,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn items(&self) -> &[VersionedItem] {
        &self.items
    }

    /// Attach the persistence-assigned id; new orders start PENDING
    pub fn into_persisted(self, id: OrderId) -> PersistedOrder {
        PersistedOrder {
            id,
            customer_id: self.customer_id,
            shipping_address: self.shipping_address,
            items: self.items,
            status: Status::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedOrderRecord")]
pub struct PersistedOrder {
    id: OrderId,
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<VersionedItem>,
    status: Status,
}

impl PersistedOrder {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn items(&self) -> &[VersionedItem] {
        &self.items
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// New snapshot with `status` replaced; `self` is left untouched
    pub fn with_status(&self, status: Status) -> PersistedOrder {
        PersistedOrder {
            status,
            ..self.clone()
        }
    }
}

// ----------------------------------------------------------------------------
// Unchecked wire shapes
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
struct RequestedOrderRecord {
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<Item>,
}

impl TryFrom<RequestedOrderRecord> for RequestedOrder {
    type Error = OrderError;

    fn try_from(record: RequestedOrderRecord) -> Result<Self, Self::Error> {
        RequestedOrder::new(record.customer_id, record.shipping_address, record.items)
    }
}

#[derive(Deserialize)]
struct VersionedOrderRecord {
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<VersionedItem>,
}

impl TryFrom<VersionedOrderRecord> for VersionedOrder {
    type Error = OrderError;

    fn try_from(record: VersionedOrderRecord) -> Result<Self, Self::Error> {
        VersionedOrder::new(record.customer_id, record.shipping_address, record.items)
    }
}

#[derive(Deserialize)]
struct PersistedOrderRecord {
    id: OrderId,
    customer_id: CustomerId,
    shipping_address: Address,
    items: Vec<VersionedItem>,
    status: Status,
}

impl TryFrom<PersistedOrderRecord> for PersistedOrder {
    type Error = OrderError;

    fn try_from(record: PersistedOrderRecord) -> Result<Self, Self::Error> {
        let order = VersionedOrder::new(record.customer_id, record.shipping_address, record.items)?;
        Ok(order.into_persisted(record.id).with_status(record.status))
    }
}

fn validate_items(items: impl Iterator<Item = (ProductId, u32)>) -> Result<(), OrderError> {
    let mut count = 0;
    for (product_id, quantity) in items {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity(product_id));
        }
        count += 1;
    }

    if count == 0 {
        return Err(OrderError::EmptyItems);
    }
    Ok(())
}
