use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use orderflow_core::OrderId;
use orderflow_orders::{OrderError, OrderStatus, PageRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let items = match dto::order_items_from_request(body) {
        Ok(items) => items,
        Err(e) => return errors::order_error_to_response(OrderError::from(e)),
    };

    match services.orders.create_order(caller.user_id(), items).await {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::ListOrdersQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<OrderStatus>() {
            Ok(status) => Some(status),
            Err(e) => return errors::order_error_to_response(OrderError::from(e)),
        },
    };

    let page = match PageRequest::new(
        query.page.unwrap_or(1),
        query.size.unwrap_or(PageRequest::DEFAULT_SIZE),
    ) {
        Ok(page) => page,
        Err(e) => return errors::order_error_to_response(OrderError::from(e)),
    };

    match services.orders.list_orders(caller.user_id(), status, page).await {
        Ok(page) => (StatusCode::OK, Json(dto::order_page_to_json(page))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id");
        }
    };

    match services.orders.get_order(order_id, caller.user_id()).await {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}
