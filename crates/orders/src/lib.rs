//! `orderflow-orders` — order domain model and placement/query workflow.
//!
//! The aggregate here is document-oriented: an [`Order`] owns its line items
//! outright, and the persisted total is a price snapshot taken at creation.
//! Storage and catalog access stay behind traits so the workflow is testable
//! without IO.

pub mod events;
pub mod order;
pub mod service;
pub mod store;

pub use events::{ORDER_CREATED_TOPIC, OrderCreated};
pub use order::{Order, OrderItem, OrderStatus};
pub use service::{OrderError, OrderService};
pub use store::{OrderStore, Page, PageRequest, StoreError};
