use std::sync::Arc;

use anyhow::Context;

use orderflow_catalog::HttpCatalogClient;
use orderflow_events::TracingNotificationSink;
use orderflow_infra::InMemoryOrderStore;
use orderflow_orders::{OrderService, OrderStore};

use crate::config::AppConfig;

/// Application services shared by all request handlers.
pub struct AppServices {
    pub orders: OrderService,
}

/// Wire up the order workflow against real backends.
///
/// The catalog is always the HTTP client (there is no local product data).
/// The store is Postgres when `DATABASE_URL` is set and the `postgres`
/// feature is compiled in, in-memory otherwise. Notifications go to the
/// tracing sink; swapping in a broker-backed sink is wiring, not workflow,
/// work.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let catalog = Arc::new(
        HttpCatalogClient::new(&config.catalog_base_url, config.catalog_timeout)
            .context("failed to construct catalog client")?,
    );
    let store = build_order_store(config).await?;
    let sink = Arc::new(TracingNotificationSink::new());

    Ok(AppServices {
        orders: OrderService::new(catalog, store, sink),
    })
}

#[cfg(feature = "postgres")]
async fn build_order_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    use orderflow_infra::PostgresOrderStore;

    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set; using the in-memory order store");
        return Ok(Arc::new(InMemoryOrderStore::new()));
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await
        .context("failed to connect to postgres")?;

    let store = PostgresOrderStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("failed to apply order store schema")?;

    tracing::info!("using the postgres order store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_order_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    if config.database_url.is_some() {
        tracing::warn!(
            "DATABASE_URL is set but the postgres feature is disabled; using the in-memory order store"
        );
    }
    Ok(Arc::new(InMemoryOrderStore::new()))
}
