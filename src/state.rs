use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{parse_config, GatewayConfig};
use crate::storage::StorageManager;

/// Shared application state / 应用共享状态
///
/// Holds no configuration snapshot, every request reloads the file.
pub struct AppState {
    pub storage_manager: StorageManager,
    pub config_path: PathBuf,
}

impl AppState {
    pub fn new(storage_manager: StorageManager, config_path: PathBuf) -> Self {
        Self { storage_manager, config_path }
    }

    /// Reload configuration for one request / 为单次请求重新加载配置
    pub async fn load_config(&self) -> Result<GatewayConfig> {
        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("read {}", self.config_path.display()))?;
        parse_config(&content)
    }
}
