use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucket_gateway::config;
use bucket_gateway::storage::StorageManager;
use bucket_gateway::{create_router, register_storage_drivers, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucket_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "bucket-gateway v{} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );

    // Load configuration, a broken file is fatal at startup / 加载配置，启动时失败直接退出
    let config_path = config::config_path();
    let app_config = config::load_config(&config_path)
        .with_context(|| format!("Failed to load configuration {:?}", config_path))?;
    tracing::info!("Configuration loaded from {:?}", config_path);

    // Register storage drivers / 注册存储驱动
    let storage_manager = StorageManager::new();
    register_storage_drivers(&storage_manager).await?;
    tracing::info!(
        "Storage drivers registered: {:?}",
        storage_manager.list_driver_types().await
    );

    let state = Arc::new(AppState::new(storage_manager, config_path));
    let app = create_router(state);

    let bind_addr = app_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
