//! In-memory catalog for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use orderflow_core::ProductId;

use crate::client::{CatalogClient, CatalogError, CatalogProduct};

/// Mutable in-memory product table.
///
/// Lookups behave exactly like the HTTP client: a missing entry is
/// `Ok(None)`. Stock is never decremented by lookups; like the real catalog,
/// this is a snapshot source, not a reservation system.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, CatalogProduct>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    pub fn upsert(&self, product: CatalogProduct) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.product_id().clone(), product);
        }
    }

    pub fn remove(&self, product_id: &ProductId) {
        if let Ok(mut products) = self.products.write() {
            products.remove(product_id);
        }
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn get_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let products = self
            .products
            .read()
            .map_err(|_| CatalogError::unavailable("product table lock poisoned"))?;

        Ok(products.get(product_id).cloned())
    }
}
