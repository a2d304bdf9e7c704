use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::identifiers::{ProductId, ProductVersionId};
use crate::domain::order::OrderError;
use crate::domain::product::{Product, ProductVersion};
use crate::ports::{PersistenceError, ProductVersionResolution, ProductVersionResolver};

// ============================================================================
// In-Memory Product Catalogue
// ============================================================================

#[derive(Default)]
struct CatalogueState {
    products: HashMap<ProductId, Product>,
    versions: HashMap<ProductVersionId, ProductVersion>,
}

#[derive(Default)]
pub struct InMemoryProductCatalogue {
    state: RwLock<CatalogueState>,
}

impl InMemoryProductCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product. An id that is already present keeps its stored
    /// entry, current version included; returns whether it was inserted.
    pub async fn add_product(&self, product: Product) -> bool {
        let mut state = self.state.write().await;
        if state.products.contains_key(&product.id) {
            tracing::warn!(product_id = %product.id, "Product already registered");
            return false;
        }
        tracing::debug!(product_id = %product.id, "Adding product");
        state.products.insert(product.id, product);
        true
    }

    /// Store a version. Does not make it current.
    pub async fn add_product_version(&self, version: ProductVersion) -> Result<(), OrderError> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&version.product_id) {
            return Err(OrderError::InvalidProductId(version.product_id));
        }
        tracing::debug!(product_id = %version.product_id, product_version_id = %version.id, "Adding product version");
        state.versions.insert(version.id, version);
        Ok(())
    }

    pub async fn set_current_version(
        &self,
        product_id: ProductId,
        version_id: ProductVersionId,
    ) -> Result<(), OrderError> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&product_id) {
            return Err(OrderError::InvalidProductId(product_id));
        }
        match state.versions.get(&version_id) {
            Some(version) if version.product_id == product_id => {}
            _ => return Err(OrderError::InvalidProductVersionId(version_id)),
        }

        if let Some(product) = state.products.get_mut(&product_id) {
            product.current_version_id = Some(version_id);
        }

        tracing::info!(product_id = %product_id, product_version_id = %version_id, "Current product version changed");
        Ok(())
    }

    pub async fn get_product(&self, product_id: ProductId) -> Option<Product> {
        self.state.read().await.products.get(&product_id).cloned()
    }

    pub async fn get_product_version(&self, version_id: ProductVersionId) -> Option<ProductVersion> {
        self.state.read().await.versions.get(&version_id).cloned()
    }
}

#[async_trait]
impl ProductVersionResolver for InMemoryProductCatalogue {
    async fn resolve(&self, product_ids: &[ProductId]) -> Result<ProductVersionResolution, PersistenceError> {
        let state = self.state.read().await;
        let mut resolution = ProductVersionResolution::default();

        for product_id in product_ids {
            match state.products.get(product_id) {
                None => {
                    resolution.invalid_ids.insert(*product_id);
                }
                Some(Product { current_version_id: None, .. }) => {
                    resolution.unversioned_ids.insert(*product_id);
                }
                Some(Product { current_version_id: Some(version_id), .. }) => {
                    resolution.versions.insert(*product_id, *version_id);
                }
            }
        }

        Ok(resolution)
    }
}
