use std::time::Duration;

/// Runtime configuration, read from the environment once at startup and
/// passed down; nothing else reads environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the product catalog service.
    pub catalog_base_url: String,
    /// Per-request deadline for catalog lookups.
    pub catalog_timeout: Duration,
    /// Postgres connection string; absent means the in-memory store.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8083".to_string());
        let catalog_base_url = std::env::var("PRODUCT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string());
        let catalog_timeout_secs = match std::env::var("CATALOG_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!("CATALOG_TIMEOUT_SECS is not a number; using 5");
                5
            }),
            Err(_) => 5,
        };
        let database_url = std::env::var("DATABASE_URL").ok();

        Self {
            bind_addr,
            catalog_base_url,
            catalog_timeout: Duration::from_secs(catalog_timeout_secs),
            database_url,
        }
    }
}
