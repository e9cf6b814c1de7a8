use orderflow_api::config::AppConfig;

#[tokio::main]
async fn main() {
    orderflow_observability::init();

    let config = AppConfig::from_env();

    let app = orderflow_api::app::build_app(&config)
        .await
        .expect("failed to build application");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", config.bind_addr, e));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
