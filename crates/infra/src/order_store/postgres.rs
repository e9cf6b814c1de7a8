//! Postgres-backed order store.
//!
//! Orders are stored document-style across two tables: an `orders` row per
//! aggregate and one `order_items` row per line, keyed by `(order_id,
//! line_no)`. Inserts write both inside a single transaction, so a stored
//! order is always complete.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Same order id inserted twice |
//! | Database (other) | Any other | `Backend` | Constraint violations, invalid data |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! ## Listing Order
//!
//! `find_by_user` sorts by `(created_at DESC, id ASC)`. Order ids are
//! UUIDv7 and therefore time-ordered, so rows created within the same
//! timestamp tick come back in creation order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};
use uuid::Uuid;

use orderflow_core::{Money, OrderId, ProductId, UserId};
use orderflow_orders::{Order, OrderItem, OrderStatus, OrderStore, Page, PageRequest, StoreError};

/// Statements applied by [`PostgresOrderStore::ensure_schema`].
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id                 UUID PRIMARY KEY,
        user_id            TEXT NOT NULL,
        status             TEXT NOT NULL,
        total_amount_cents BIGINT NOT NULL CHECK (total_amount_cents >= 0),
        created_at         TIMESTAMPTZ NOT NULL,
        updated_at         TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        order_id   UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
        line_no    INTEGER NOT NULL,
        product_id TEXT NOT NULL,
        quantity   INTEGER NOT NULL CHECK (quantity > 0),
        PRIMARY KEY (order_id, line_no)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS orders_user_created_idx
        ON orders (user_id, created_at DESC, id ASC)
    "#,
];

/// Postgres-backed order store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync).
/// The store can be cloned cheaply and shared across request tasks.
///
/// ## Duplicate Detection
///
/// The primary key on `orders.id` is the only duplicate check: a second
/// insert with the same id fails with a unique violation, which this store
/// reports as [`StoreError::Conflict`] rather than upserting.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    /// Create a new PostgresOrderStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the tables and index this store needs, if absent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    #[instrument(
        skip(self, order),
        fields(
            order_id = %order.id(),
            user_id = %order.user_id(),
            item_count = order.items().len()
        ),
        err
    )]
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError> {
        let span = Span::current();
        span.record("operation", "insert_order");

        let id = Uuid::from(order.id());
        let total_cents = i64::try_from(order.total_amount().cents())
            .map_err(|_| StoreError::backend("order total exceeds the storable range"))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id,
                user_id,
                status,
                total_amount_cents,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(order.user_id().as_str())
        .bind(order.status().as_str())
        .bind(total_cents)
        .bind(order.created_at())
        .bind(order.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(order.id())
            } else {
                map_sqlx_error("insert_order", e)
            }
        })?;

        for (idx, item) in order.items().iter().enumerate() {
            let line_no = idx as i32 + 1;
            let quantity = i32::try_from(item.quantity()).map_err(|_| {
                StoreError::backend(format!("line {} quantity exceeds the storable range", line_no))
            })?;

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, line_no, product_id, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(line_no)
            .bind(item.product_id().as_str())
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_item", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %order_id), err)]
    async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let span = Span::current();
        span.record("operation", "fetch_order");

        let row = sqlx::query(
            r#"
            SELECT
                id,
                user_id,
                status,
                total_amount_cents,
                created_at,
                updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(order_id))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_order", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order_row = OrderRow::from_row(&row)
            .map_err(|e| StoreError::backend(format!("failed to deserialize order row: {}", e)))?;
        let items = self.load_items(order_row.id).await?;

        hydrate_order(order_row, items).map(Some)
    }

    #[instrument(
        skip(self),
        fields(
            user_id = %user_id,
            status = status.map(|s| s.as_str()),
            page = page.page(),
            size = page.size()
        ),
        err
    )]
    async fn fetch_user_orders(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let span = Span::current();
        span.record("operation", "fetch_user_orders");

        let status_param: Option<&str> = status.map(|s| s.as_str());

        let count_row = sqlx::query(
            r#"
            SELECT COUNT(*) as total
            FROM orders
            WHERE user_id = $1
                AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(user_id.as_str())
        .bind(status_param)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_user_orders", e))?;

        let total: i64 = count_row
            .try_get("total")
            .map_err(|e| StoreError::backend(format!("failed to read count: {}", e)))?;

        let rows = sqlx::query(
            r#"
            SELECT
                id,
                user_id,
                status,
                total_amount_cents,
                created_at,
                updated_at
            FROM orders
            WHERE user_id = $1
                AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id.as_str())
        .bind(status_param)
        .bind(i64::from(page.size()))
        .bind(page.offset() as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_user_orders", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order_row = OrderRow::from_row(&row).map_err(|e| {
                StoreError::backend(format!("failed to deserialize order row: {}", e))
            })?;
            let items = self.load_items(order_row.id).await?;
            orders.push(hydrate_order(order_row, items)?);
        }

        span.record("order_count", orders.len());
        Ok(Page {
            items: orders,
            total_items: total as u64,
            page: page.page(),
            size: page.size(),
        })
    }

    /// Load one order's line items in line number order.
    async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_items", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item_row = OrderItemRow::from_row(&row).map_err(|e| {
                StoreError::backend(format!("failed to deserialize order item row: {}", e))
            })?;
            items.push(item_row.try_into()?);
        }
        Ok(items)
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        self.insert_order(order).await
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        self.fetch_order(order_id).await
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        self.fetch_user_orders(user_id, status, page).await
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

/// Rebuild the aggregate from its stored parts.
///
/// Rows that fail domain validation (unknown status, empty items) mean the
/// table was modified outside this store; they surface as `Backend` errors.
fn hydrate_order(row: OrderRow, items: Vec<OrderItem>) -> Result<Order, StoreError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|e| StoreError::backend(format!("corrupt order row (user_id): {}", e)))?;
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(|e| StoreError::backend(format!("corrupt order row (status): {}", e)))?;
    let total_cents = u64::try_from(row.total_amount_cents).map_err(|_| {
        StoreError::backend("corrupt order row (total_amount_cents): negative total")
    })?;

    Order::rehydrate(
        OrderId::from_uuid(row.id),
        user_id,
        items,
        status,
        Money::from_cents(total_cents),
        row.created_at,
        row.updated_at,
    )
    .map_err(|e| StoreError::backend(format!("corrupt order row: {}", e)))
}

// SQLx row types

#[derive(Debug)]
struct OrderRow {
    id: Uuid,
    user_id: String,
    status: String,
    total_amount_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            status: row.try_get("status")?,
            total_amount_cents: row.try_get("total_amount_cents")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug)]
struct OrderItemRow {
    product_id: String,
    quantity: i32,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderItemRow {
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = StoreError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let product_id = ProductId::new(row.product_id)
            .map_err(|e| StoreError::backend(format!("corrupt order item row (product_id): {}", e)))?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            StoreError::backend("corrupt order item row (quantity): negative quantity")
        })?;
        OrderItem::new(product_id, quantity)
            .map_err(|e| StoreError::backend(format!("corrupt order item row: {}", e)))
    }
}
