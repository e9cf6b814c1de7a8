use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use orderflow_core::{OrderId, UserId};
use orderflow_orders::{Order, OrderStatus, OrderStore, Page, PageRequest, StoreError};

/// In-memory order store.
///
/// Intended for tests/dev. Keeps every order in one vector and pages by
/// sorting on demand, so it is not optimized for large volumes. Listing
/// order matches the Postgres store: newest first, identifier ascending
/// among equal creation timestamps.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders currently held, across all users.
    pub fn len(&self) -> usize {
        self.orders.read().map(|orders| orders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        if orders.iter().any(|existing| existing.id() == order.id()) {
            return Err(StoreError::Conflict(order.id()));
        }

        orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        Ok(orders.iter().find(|order| order.id() == order_id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let mut matching: Vec<&Order> = orders
            .iter()
            .filter(|order| order.user_id() == user_id)
            .filter(|order| status.is_none_or(|wanted| order.status() == wanted))
            .collect();

        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| Uuid::from(a.id()).cmp(&Uuid::from(b.id())))
        });

        let total_items = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total_items,
            page: page.page(),
            size: page.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use orderflow_core::{Money, ProductId};
    use orderflow_orders::OrderItem;

    use super::*;

    fn user(raw: &str) -> UserId {
        UserId::new(raw).unwrap()
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem::new(ProductId::new("1").unwrap(), 1).unwrap()]
    }

    fn order_at(user_id: &UserId, seconds: i64) -> Order {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Order::create(
            user_id.clone(),
            items(),
            Money::from_cents(1000),
            base + Duration::seconds(seconds),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn inserted_orders_can_be_fetched_by_id() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(order_at(&user("u-1"), 0)).await.unwrap();

        let found = store.find_by_id(order.id()).await.unwrap();
        assert_eq!(found, Some(order));
    }

    #[tokio::test]
    async fn missing_ids_come_back_as_none() {
        let store = InMemoryOrderStore::new();
        assert_eq!(store.find_by_id(OrderId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn reinserting_an_id_is_a_conflict() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(order_at(&user("u-1"), 0)).await.unwrap();

        let err = store.insert(order.clone()).await.unwrap_err();
        match err {
            StoreError::Conflict(id) => assert_eq!(id, order.id()),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_requested_user() {
        let store = InMemoryOrderStore::new();
        let alice = user("alice");
        let bob = user("bob");
        store.insert(order_at(&alice, 0)).await.unwrap();
        store.insert(order_at(&bob, 1)).await.unwrap();
        store.insert(order_at(&alice, 2)).await.unwrap();

        let page = store
            .find_by_user(&alice, None, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 2);
        assert!(page.items.iter().all(|o| o.user_id() == &alice));
    }

    #[tokio::test]
    async fn listing_returns_newest_orders_first() {
        let store = InMemoryOrderStore::new();
        let alice = user("alice");
        for seconds in [0, 30, 10] {
            store.insert(order_at(&alice, seconds)).await.unwrap();
        }

        let page = store
            .find_by_user(&alice, None, PageRequest::default())
            .await
            .unwrap();

        let stamps: Vec<_> = page.items.iter().map(|o| o.created_at()).collect();
        let mut sorted = stamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(stamps, sorted);
    }

    #[tokio::test]
    async fn equal_timestamps_list_in_ascending_id_order() {
        let store = InMemoryOrderStore::new();
        let alice = user("alice");
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let order_with_id = |raw: &str| {
            Order::rehydrate(
                OrderId::from_uuid(Uuid::parse_str(raw).unwrap()),
                alice.clone(),
                items(),
                OrderStatus::Pending,
                Money::from_cents(1000),
                base,
                base,
            )
            .unwrap()
        };
        let low = order_with_id("018f3c7e-0000-7000-8000-000000000001");
        let high = order_with_id("018f3c7e-0000-7000-8000-000000000002");

        // Insert out of id order to prove the tie-break reads ids.
        store.insert(high.clone()).await.unwrap();
        store.insert(low.clone()).await.unwrap();

        let page = store
            .find_by_user(&alice, None, PageRequest::default())
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![low.id(), high.id()]);
    }

    #[tokio::test]
    async fn listing_can_narrow_to_one_status() {
        let store = InMemoryOrderStore::new();
        let alice = user("alice");
        let mut shipped = order_at(&alice, 0);
        shipped.change_status(OrderStatus::Shipped, Utc::now());
        store.insert(shipped.clone()).await.unwrap();
        store.insert(order_at(&alice, 1)).await.unwrap();

        let page = store
            .find_by_user(&alice, Some(OrderStatus::Shipped), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id(), shipped.id());

        let none = store
            .find_by_user(&alice, Some(OrderStatus::Cancelled), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(none.total_items, 0);
        assert!(none.items.is_empty());
    }

    #[tokio::test]
    async fn pages_split_the_result_set() {
        let store = InMemoryOrderStore::new();
        let alice = user("alice");
        for seconds in 0..25 {
            store.insert(order_at(&alice, seconds)).await.unwrap();
        }

        let first = store
            .find_by_user(&alice, None, PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_items, 25);
        assert_eq!(first.total_pages(), 3);

        let last = store
            .find_by_user(&alice, None, PageRequest::new(3, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);

        let beyond = store
            .find_by_user(&alice, None, PageRequest::new(4, 10).unwrap())
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 25);
    }
}
