use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use orderflow_core::{DomainError, DomainResult, Money, OrderId, ProductId, UserId};

/// Order status lifecycle.
///
/// Every order starts out `Pending`; later transitions are driven by
/// external collaborators (payment, fulfilment) through
/// [`Order::change_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status: {}",
                other
            ))),
        }
    }
}

/// Order line item: product reference plus quantity.
///
/// The product id points into the external catalog and is not owned here.
/// Line items carry no unit price; the order's total is the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    product_id: ProductId,
    quantity: u32,
}

impl OrderItem {
    pub fn new(product_id: ProductId, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Aggregate root: Order.
///
/// Owns its line items outright (document-oriented). Once built, an order is
/// immutable except for status transitions, which also bump `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    items: Vec<OrderItem>,
    status: OrderStatus,
    total_amount: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order owned by `user_id`.
    ///
    /// `total_amount` is the snapshot total the workflow computed from
    /// catalog prices; it is stored as-is and never recomputed. Both
    /// timestamps are set to `now`.
    pub fn create(
        user_id: UserId,
        items: Vec<OrderItem>,
        total_amount: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one item",
            ));
        }

        Ok(Self {
            id: OrderId::new(),
            user_id,
            items,
            status: OrderStatus::Pending,
            total_amount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a persisted order from its stored parts.
    ///
    /// For store implementations only; invariants still hold (a stored order
    /// without items is corrupt, not empty).
    pub fn rehydrate(
        id: OrderId,
        user_id: UserId,
        items: Vec<OrderItem>,
        status: OrderStatus,
        total_amount: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one item",
            ));
        }

        Ok(Self {
            id,
            user_id,
            items,
            status,
            total_amount,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move the order to `status`, bumping `updated_at`.
    pub fn change_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
