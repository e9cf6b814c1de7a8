//! Notification payloads emitted by the order workflow.

use chrono::{DateTime, Utc};
use serde::Serialize;

use orderflow_core::{Money, OrderId, UserId};
use orderflow_events::DomainEvent;

use crate::order::{Order, OrderItem};

/// Topic carrying [`OrderCreated`] notifications.
pub const ORDER_CREATED_TOPIC: &str = "order.created";

/// Fact: an order was accepted and persisted.
///
/// The payload is self-contained so downstream consumers (notifications,
/// analytics) never have to call back into this service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub total_amount: Money,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl OrderCreated {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id(),
            user_id: order.user_id().clone(),
            total_amount: order.total_amount(),
            items: order.items().to_vec(),
            created_at: order.created_at(),
        }
    }
}

impl DomainEvent for OrderCreated {
    fn topic(&self) -> &'static str {
        ORDER_CREATED_TOPIC
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
