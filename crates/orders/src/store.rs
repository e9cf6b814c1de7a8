//! Order persistence contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use orderflow_core::{DomainError, DomainResult, OrderId, UserId};

use crate::order::{Order, OrderStatus};

/// A 1-based page request with a bounded size.
///
/// Out-of-range values are rejected at construction, not clamped, so a
/// caller asking for page 0 or size 500 learns about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: u32, size: u32) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if size == 0 || size > Self::MAX_SIZE {
            return Err(DomainError::validation(format!(
                "size must be between 1 and {}",
                Self::MAX_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// One page of results plus the totals a client needs for paging UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        (self.total_items + u64::from(self.size) - 1) / u64::from(self.size)
    }

    /// Convert the items while keeping the paging envelope.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            size: self.size,
        }
    }
}

/// Order store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order with the same identifier is already persisted.
    #[error("order {0} already exists")]
    Conflict(OrderId),

    /// The backing store failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Persistence port for orders.
///
/// Implementations must be safe to share across request tasks. Listing is
/// always scoped to one user and ordered newest-first, with insertion order
/// preserved among equal creation timestamps.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order. The identifier was minted at creation time;
    /// persisting the same identifier twice is a conflict, not an upsert.
    async fn insert(&self, order: Order) -> Result<Order, StoreError>;

    /// Fetch one order by identifier, regardless of owner.
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Page through one user's orders, optionally narrowed to a status.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError>;
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        (**self).insert(order).await
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_by_id(order_id).await
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        (**self).find_by_user(user_id, status, page).await
    }
}
