//! Catalog client contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use orderflow_core::{Money, ProductId};

/// Point-in-time snapshot of a catalog product.
///
/// Carries exactly what the catalog contract exposes and the workflow needs:
/// the unit price and available stock at lookup time. No reservation is
/// implied; stock may change the moment this value is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    product_id: ProductId,
    name: String,
    unit_price: Money,
    stock_quantity: u32,
    available: bool,
}

impl CatalogProduct {
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        stock_quantity: u32,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            stock_quantity,
            available: true,
        }
    }

    /// Override the catalog's availability flag (defaults to true).
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn available(&self) -> bool {
        self.available
    }
}

/// Catalog lookup failure.
///
/// `Unavailable` covers transport errors, timeouts, unexpected statuses and
/// malformed documents; a missing product is **not** an error (it is
/// `Ok(None)` on the client).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read-only access to the product catalog.
///
/// Lookups have no side effects and may be retried freely by callers.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a product by identifier.
    ///
    /// `Ok(None)` means the catalog answered and the product does not exist.
    async fn get_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError>;
}

#[async_trait]
impl<C> CatalogClient for Arc<C>
where
    C: CatalogClient + ?Sized,
{
    async fn get_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        (**self).get_product(product_id).await
    }
}
