//! HTTP catalog client (product-service API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use orderflow_core::{Money, ProductId};

use crate::client::{CatalogClient, CatalogError, CatalogProduct};

/// Wire document returned by `GET /api/products/{id}`.
///
/// The upstream sends the price as a decimal number. It is converted to
/// minor units at this boundary; a price that does not fit two decimals is
/// a malformed response, not a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    product_id: String,
    #[serde(default)]
    name: String,
    price: serde_json::Number,
    stock_quantity: u32,
    #[serde(default = "default_available")]
    is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Client for the catalog service's HTTP API.
///
/// Every request carries the deadline supplied at construction; exceeding it
/// surfaces as [`CatalogError::Unavailable`], never as product absence.
pub struct HttpCatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::unavailable(format!("client construction: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let url = format!("{}/api/products/{}", self.base_url, product_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CatalogError::unavailable(format!(
                "unexpected status {}",
                response.status().as_u16()
            )));
        }

        let document: ProductDocument = response
            .json()
            .await
            .map_err(|e| CatalogError::unavailable(format!("malformed product document: {}", e)))?;

        document_to_product(document).map(Some)
    }
}

fn document_to_product(document: ProductDocument) -> Result<CatalogProduct, CatalogError> {
    let product_id = ProductId::new(document.product_id)
        .map_err(|e| CatalogError::unavailable(format!("malformed product document: {}", e)))?;
    let unit_price = Money::parse_decimal(&document.price.to_string())
        .map_err(|e| CatalogError::unavailable(format!("unrepresentable price: {}", e)))?;

    Ok(
        CatalogProduct::new(product_id, document.name, unit_price, document.stock_quantity)
            .with_available(document.is_available),
    )
}
