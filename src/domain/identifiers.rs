use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Entity Identifiers
// ============================================================================
//
// Opaque, comparable tokens. One newtype per entity so an order id can never
// be passed where a product id is expected.
//
// ============================================================================

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

identifier!(
    /// Identifies the customer who placed an order
    CustomerId
);
identifier!(
    /// Identifies a persisted order; assigned once by the persistence layer
    OrderId
);
identifier!(
    /// Identifies a product in the catalogue
    ProductId
);
identifier!(
    /// Identifies one immutable snapshot of a product
    ProductVersionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique() {
        assert_ne!(OrderId::new(), OrderId::new());
        assert_ne!(ProductId::new(), ProductId::new());
    }

    #[test]
    fn test_identifier_round_trips_through_uuid() {
        let uuid = Uuid::new_v4();
        let id = ProductVersionId::from_uuid(uuid);

        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(ProductVersionId::from(uuid), id);
    }

    #[test]
    fn test_identifier_serializes_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&CustomerId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
