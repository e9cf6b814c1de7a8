use axum::{Router, routing::get};

pub mod orders;
pub mod system;

/// Router for all identity-protected endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/orders", orders::router())
}
