//! Order placement and query workflow.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use orderflow_catalog::{CatalogClient, CatalogError};
use orderflow_core::{DomainError, Money, OrderId, ProductId, UserId};
use orderflow_events::{DomainEvent, NotificationSink};

use crate::events::OrderCreated;
use crate::order::{Order, OrderItem, OrderStatus};
use crate::store::{OrderStore, Page, PageRequest, StoreError};

/// Failures surfaced by the order workflow.
///
/// `OrderNotFound` deliberately carries no identifier: it covers both an
/// order that does not exist and one owned by a different user, and callers
/// must not be able to tell the two apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Malformed or empty request.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced product does not exist in the catalog.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The catalog has less stock than the requested quantity.
    #[error("Insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The order is absent or not owned by the caller.
    #[error("Order not found")]
    OrderNotFound,

    /// The catalog could not be consulted; item validity is unknown.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// An order with this identifier is already persisted.
    #[error("order {0} already exists")]
    Conflict(OrderId),

    /// The order store failed.
    #[error("storage backend failure: {0}")]
    Store(String),
}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => OrderError::Validation(msg),
            DomainError::InvalidId(msg) => OrderError::Validation(msg),
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(order_id) => OrderError::Conflict(order_id),
            StoreError::Backend(msg) => OrderError::Store(msg),
        }
    }
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable(msg) => OrderError::CatalogUnavailable(msg),
        }
    }
}

/// Sum of `unit_price × quantity` over the priced items; `None` on overflow.
fn order_total(priced_items: &[(Money, u32)]) -> Option<Money> {
    priced_items
        .iter()
        .try_fold(Money::ZERO, |total, (unit_price, quantity)| {
            unit_price
                .checked_mul(*quantity)
                .and_then(|line_total| total.checked_add(line_total))
        })
}

/// Order placement and query workflow.
///
/// The only component with orchestration logic; catalog, store and sink are
/// injected ports so the workflow runs unchanged against in-memory or real
/// backends.
pub struct OrderService {
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn OrderStore>,
    sink: Arc<dyn NotificationSink>,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn OrderStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            catalog,
            store,
            sink,
        }
    }

    /// Place a new order for `user_id`.
    ///
    /// Items are validated against the catalog one by one, in submission
    /// order, and the first failure wins. Prices observed here become the
    /// order's permanent total. Nothing is persisted unless every item
    /// passes; an unreachable catalog fails the whole call (fail-closed).
    pub async fn create_order(
        &self,
        user_id: &UserId,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }

        let mut priced_items = Vec::with_capacity(items.len());
        for item in &items {
            let product = self
                .catalog
                .get_product(item.product_id())
                .await?
                .ok_or_else(|| OrderError::ProductNotFound(item.product_id().clone()))?;

            if product.stock_quantity() < item.quantity() {
                return Err(OrderError::InsufficientStock(item.product_id().clone()));
            }

            tracing::debug!(
                product_id = %product.product_id(),
                name = %product.name(),
                "order item validated"
            );
            priced_items.push((product.unit_price(), item.quantity()));
        }

        let total = order_total(&priced_items)
            .ok_or_else(|| OrderError::Validation("order total overflows".into()))?;

        let order = Order::create(user_id.clone(), items, total, Utc::now())?;
        let order = self.store.insert(order).await?;

        self.publish_created(&order);

        Ok(order)
    }

    /// List the caller's own orders, newest first.
    pub async fn list_orders(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, OrderError> {
        Ok(self.store.find_by_user(user_id, status, page).await?)
    }

    /// Fetch one order the caller owns.
    pub async fn get_order(
        &self,
        order_id: OrderId,
        user_id: &UserId,
    ) -> Result<Order, OrderError> {
        match self.store.find_by_id(order_id).await? {
            Some(order) if order.user_id() == user_id => Ok(order),
            _ => Err(OrderError::OrderNotFound),
        }
    }

    /// Best-effort announcement; the order is already durable, so failures
    /// are logged and swallowed.
    fn publish_created(&self, order: &Order) {
        let event = OrderCreated::from_order(order);
        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id(),
                    error = %e,
                    "failed to encode order.created payload"
                );
                return;
            }
        };

        if let Err(e) = self.sink.publish(event.topic(), payload) {
            tracing::warn!(
                order_id = %order.id(),
                error = %e,
                "failed to publish order.created"
            );
        }
    }
}
