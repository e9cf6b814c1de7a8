//! `orderflow-infra` — persistence backends for the order domain.
//!
//! Implements the `OrderStore` port from `orderflow-orders`. The in-memory
//! store is always available; the Postgres store sits behind the `postgres`
//! feature so library consumers do not pull in SQLx unless they need it.

pub mod order_store;

pub use order_store::InMemoryOrderStore;
#[cfg(feature = "postgres")]
pub use order_store::PostgresOrderStore;

mod integration_tests;
