use serde::Deserialize;

use orderflow_core::{DomainResult, ProductId};
use orderflow_orders::{Order, OrderItem, Page};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Turn request line items into domain line items, first failure wins.
pub fn order_items_from_request(request: CreateOrderRequest) -> DomainResult<Vec<OrderItem>> {
    request
        .items
        .into_iter()
        .map(|item| OrderItem::new(ProductId::new(item.product_id)?, item.quantity))
        .collect()
}

// -------------------------
// Response mapping
// -------------------------

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "orderId": order.id().to_string(),
        "userId": order.user_id().as_str(),
        "items": order.items().iter().map(|item| serde_json::json!({
            "productId": item.product_id().as_str(),
            "quantity": item.quantity(),
        })).collect::<Vec<_>>(),
        "status": order.status().as_str(),
        "totalAmount": order.total_amount().cents(),
        "createdAt": order.created_at().to_rfc3339(),
        "updatedAt": order.updated_at().to_rfc3339(),
    })
}

pub fn order_page_to_json(page: Page<Order>) -> serde_json::Value {
    serde_json::json!({
        "items": page.items.iter().map(order_to_json).collect::<Vec<_>>(),
        "totalItems": page.total_items,
        "totalPages": page.total_pages(),
    })
}
