use std::time::Duration;

use axum::response::IntoResponse;
use axum::{Json, Router, extract::Path, routing::get};
use orderflow_api::app::build_app;
use orderflow_api::config::AppConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    catalog_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// App wired to a local catalog stub that knows products "1" and "2".
    async fn spawn() -> Self {
        let (catalog_url, catalog_handle) = spawn_catalog_stub().await;
        let mut srv = Self::spawn_with_catalog(&catalog_url).await;
        srv.catalog_handle = Some(catalog_handle);
        srv
    }

    async fn spawn_with_catalog(catalog_base_url: &str) -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            catalog_base_url: catalog_base_url.to_string(),
            catalog_timeout: Duration::from_secs(2),
            database_url: None,
        };
        let app = build_app(&config).await.expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            catalog_handle: None,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        if let Some(handle) = &self.catalog_handle {
            handle.abort();
        }
    }
}

/// Stand-in for the product service: two products, everything else 404s.
async fn spawn_catalog_stub() -> (String, tokio::task::JoinHandle<()>) {
    async fn product(Path(id): Path<String>) -> axum::response::Response {
        let doc = match id.as_str() {
            "1" => json!({
                "productId": "1",
                "name": "Laptop",
                "price": 100.0,
                "stockQuantity": 10,
                "isAvailable": true,
            }),
            "2" => json!({
                "productId": "2",
                "name": "Mouse",
                "price": 49.99,
                "stockQuantity": 5,
                "isAvailable": true,
            }),
            _ => return axum::http::StatusCode::NOT_FOUND.into_response(),
        };
        Json(doc).into_response()
    }

    let app = Router::new().route("/api/products/:id", get(product));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind catalog stub port");
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base_url, handle)
}

/// A base URL nothing listens on: bind an ephemeral port, then drop the
/// listener so connections to it are refused.
async fn dead_catalog_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind throwaway port");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn create_order(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/v1/orders", base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/v1/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/v1/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn caller_identity_is_derived_from_token() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/v1/whoami", srv.base_url))
        .bearer_auth("alice")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["userId"].as_str().unwrap(), "alice");
}

#[tokio::test]
async fn order_lifecycle_create_get_list() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = create_order(
        &client,
        &srv.base_url,
        "alice",
        json!({ "items": [{ "productId": "1", "quantity": 2 }] }),
    )
    .await;
    if res.status() != StatusCode::CREATED {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 201 Created, got {status} body={body}");
    }
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["orderId"].as_str().unwrap().to_string();
    assert_eq!(created["userId"], "alice");
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["totalAmount"], 20000);
    assert_eq!(created["items"][0]["productId"], "1");
    assert_eq!(created["items"][0]["quantity"], 2);

    // Get by id
    let res = client
        .get(format!("{}/api/v1/orders/{}", srv.base_url, id))
        .bearer_auth("alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["orderId"].as_str().unwrap(), id);

    // List
    let res = client
        .get(format!("{}/api/v1/orders", srv.base_url))
        .bearer_auth("alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["orderId"].as_str().unwrap(), id);
}

#[tokio::test]
async fn order_lookup_does_not_reveal_other_users_orders() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create_order(
        &client,
        &srv.base_url,
        "alice",
        json!({ "items": [{ "productId": "1", "quantity": 1 }] }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["orderId"].as_str().unwrap().to_string();

    // Someone else's order and a nonexistent order must be indistinguishable.
    let res = client
        .get(format!("{}/api/v1/orders/{}", srv.base_url, id))
        .bearer_auth("bob")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let foreign: serde_json::Value = res.json().await.unwrap();

    let res = client
        .get(format!(
            "{}/api/v1/orders/11111111-1111-4111-8111-111111111111",
            srv.base_url
        ))
        .bearer_auth("bob")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let missing: serde_json::Value = res.json().await.unwrap();

    assert_eq!(foreign, missing);
    assert_eq!(foreign["error"], "not_found");
    assert_eq!(foreign["message"], "Order not found");

    // Bob's listing stays empty too.
    let res = client
        .get(format!("{}/api/v1/orders", srv.base_url))
        .bearer_auth("bob")
        .send()
        .await
        .unwrap();
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page["totalItems"], 0);
}

#[tokio::test]
async fn malformed_order_ids_are_rejected() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/v1/orders/not-a-uuid", srv.base_url))
        .bearer_auth("alice")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn rejects_unknown_products_and_oversells() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create_order(
        &client,
        &srv.base_url,
        "alice",
        json!({ "items": [{ "productId": "999", "quantity": 1 }] }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Product 999 not found");

    let res = create_order(
        &client,
        &srv.base_url,
        "alice",
        json!({ "items": [{ "productId": "2", "quantity": 6 }] }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["message"], "Insufficient stock for product 2");

    let res = create_order(&client, &srv.base_url, "alice", json!({ "items": [] })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn rejects_out_of_range_pagination() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for query in ["page=0", "size=0", "size=101", "status=BOGUS"] {
        let res = client
            .get(format!("{}/api/v1/orders?{}", srv.base_url, query))
            .bearer_auth("alice")
            .send()
            .await
            .unwrap();
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "query {query} should be rejected"
        );
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "validation_error", "query {query}");
    }
}

#[tokio::test]
async fn catalog_outage_maps_to_bad_gateway() {
    let srv = TestServer::spawn_with_catalog(&dead_catalog_url().await).await;
    let client = reqwest::Client::new();

    let res = create_order(
        &client,
        &srv.base_url,
        "alice",
        json!({ "items": [{ "productId": "1", "quantity": 1 }] }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "catalog_unavailable");
}
