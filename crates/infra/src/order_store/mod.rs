//! Order store implementations.
//!
//! The store contract lives in `orderflow-orders` as a pure port. This
//! module provides the backed implementations: an in-memory store for
//! tests/dev and a Postgres store for deployments.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryOrderStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderStore;
