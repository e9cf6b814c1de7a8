//! `orderflow-catalog` — read-only client for the external product catalog.
//!
//! The order workflow validates line items against the catalog service owned
//! by another team. This crate keeps that dependency at arm's length: one
//! trait, one HTTP implementation, one in-memory implementation for
//! tests/dev. Absence of a product and unavailability of the catalog are
//! distinct outcomes and must never be conflated.

pub mod client;
pub mod http;
pub mod memory;

pub use client::{CatalogClient, CatalogError, CatalogProduct};
pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalog;
