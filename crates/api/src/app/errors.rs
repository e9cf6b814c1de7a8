use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderflow_orders::OrderError;

pub fn order_error_to_response(err: OrderError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        OrderError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        OrderError::ProductNotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        OrderError::InsufficientStock(_) => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", message)
        }
        OrderError::OrderNotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        OrderError::CatalogUnavailable(_) => {
            json_error(StatusCode::BAD_GATEWAY, "catalog_unavailable", message)
        }
        OrderError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        OrderError::Store(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
