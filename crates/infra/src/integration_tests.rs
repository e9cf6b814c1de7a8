//! Integration tests for the full order pipeline.
//!
//! Tests: workflow -> catalog client -> order store -> notification sink
//!
//! Verifies:
//! - Placed orders are durable and readable back through the same store
//! - Listing pages correctly over realistic volumes
//! - Orders of other users stay invisible
//! - Stock checks read a point-in-time snapshot, not a reservation

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use orderflow_catalog::{CatalogProduct, InMemoryCatalog};
    use orderflow_core::{Money, OrderId, ProductId, UserId};
    use orderflow_events::{InMemoryNotificationSink, Subscription};
    use orderflow_orders::{
        ORDER_CREATED_TOPIC, Order, OrderError, OrderItem, OrderService, OrderStatus, OrderStore,
        PageRequest,
    };

    use crate::order_store::InMemoryOrderStore;

    fn user(raw: &str) -> UserId {
        UserId::new(raw).unwrap()
    }

    fn product(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn item(product_id: &str, quantity: u32) -> OrderItem {
        OrderItem::new(product(product_id), quantity).unwrap()
    }

    fn seeded_catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products([
            CatalogProduct::new(product("1"), "Laptop", Money::from_cents(10000), 10),
            CatalogProduct::new(product("2"), "Mouse", Money::from_cents(4999), 5),
        ])
    }

    fn setup() -> (OrderService, Subscription, Arc<InMemoryOrderStore>) {
        setup_with(seeded_catalog())
    }

    fn setup_with(
        catalog: InMemoryCatalog,
    ) -> (OrderService, Subscription, Arc<InMemoryOrderStore>) {
        let store = Arc::new(InMemoryOrderStore::new());
        let sink = Arc::new(InMemoryNotificationSink::new());
        let subscription = sink.subscribe();
        let service = OrderService::new(Arc::new(catalog), store.clone(), sink);
        (service, subscription, store)
    }

    #[tokio::test]
    async fn placed_orders_round_trip_through_the_store() {
        let (service, notifications, _store) = setup();
        let alice = user("alice");

        let placed = service
            .create_order(&alice, vec![item("1", 2), item("2", 1)])
            .await
            .unwrap();
        assert_eq!(placed.total_amount(), Money::from_cents(24999));
        assert_eq!(placed.status(), OrderStatus::Pending);

        let fetched = service.get_order(placed.id(), &alice).await.unwrap();
        assert_eq!(fetched, placed);

        let page = service
            .list_orders(&alice, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id(), placed.id());

        let note = notifications.try_recv().unwrap();
        assert_eq!(note.topic, ORDER_CREATED_TOPIC);
        assert_eq!(
            note.payload["orderId"].as_str(),
            Some(placed.id().to_string().as_str())
        );
    }

    #[tokio::test]
    async fn listing_pages_over_realistic_volumes() {
        let (service, _notifications, _store) = setup();
        let alice = user("alice");

        let mut placed_ids = Vec::new();
        for _ in 0..25 {
            let order = service
                .create_order(&alice, vec![item("1", 1)])
                .await
                .unwrap();
            placed_ids.push(order.id());
        }

        let mut listed = Vec::new();
        for page_no in 1..=3 {
            let page = service
                .list_orders(&alice, None, PageRequest::new(page_no, 10).unwrap())
                .await
                .unwrap();
            assert_eq!(page.total_items, 25);
            assert_eq!(page.total_pages(), 3);
            assert_eq!(page.items.len(), if page_no == 3 { 5 } else { 10 });
            listed.extend(page.items);
        }

        // Newest first across page boundaries, nothing duplicated or lost.
        for window in listed.windows(2) {
            assert!(window[0].created_at() >= window[1].created_at());
        }
        let mut listed_ids: Vec<_> = listed.iter().map(|o| o.id()).collect();
        listed_ids.sort_by_key(|id| uuid::Uuid::from(*id));
        placed_ids.sort_by_key(|id| uuid::Uuid::from(*id));
        assert_eq!(listed_ids, placed_ids);
    }

    #[tokio::test]
    async fn orders_of_other_users_stay_invisible() {
        let (service, _notifications, _store) = setup();
        let alice = user("alice");
        let bob = user("bob");

        let placed = service
            .create_order(&alice, vec![item("1", 1)])
            .await
            .unwrap();

        // Someone else's order and a nonexistent one are the same error.
        let foreign = service.get_order(placed.id(), &bob).await.unwrap_err();
        assert_eq!(foreign, OrderError::OrderNotFound);
        let missing = service.get_order(OrderId::new(), &bob).await.unwrap_err();
        assert_eq!(foreign, missing);

        let page = service
            .list_orders(&bob, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn status_filters_flow_through_the_stack() {
        let (service, _notifications, store) = setup();
        let alice = user("alice");

        service
            .create_order(&alice, vec![item("1", 1)])
            .await
            .unwrap();

        let mut confirmed = Order::create(
            alice.clone(),
            vec![item("2", 1)],
            Money::from_cents(4999),
            Utc::now(),
        )
        .unwrap();
        confirmed.change_status(OrderStatus::Confirmed, Utc::now());
        let confirmed = store.insert(confirmed).await.unwrap();

        let page = service
            .list_orders(&alice, Some(OrderStatus::Confirmed), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id(), confirmed.id());

        let all = service
            .list_orders(&alice, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_items, 2);
    }

    #[tokio::test]
    async fn stock_checks_are_snapshots_not_reservations() {
        let catalog = InMemoryCatalog::with_products([CatalogProduct::new(
            product("9"),
            "Webcam",
            Money::from_cents(2500),
            3,
        )]);
        let (service, _notifications, store) = setup_with(catalog);
        let alice = user("alice");
        let bob = user("bob");

        // Each order alone passes the stock check against the same 3 units.
        // Nothing decrements catalog stock here, so together they oversell;
        // reconciliation belongs to fulfilment, not order placement.
        service
            .create_order(&alice, vec![item("9", 3)])
            .await
            .unwrap();
        service
            .create_order(&bob, vec![item("9", 3)])
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
    }
}
