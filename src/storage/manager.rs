use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use anyhow::{anyhow, Result};

use super::StorageDriver;
use crate::config::GatewayConfig;

pub type DriverBox = Box<dyn StorageDriver>;

/// Driver factory trait / 驱动工厂 trait
pub trait DriverFactory: Send + Sync {
    /// Driver type name (route key) / 驱动类型名称
    fn driver_type(&self) -> &'static str;

    /// Create a driver from the current configuration / 根据当前配置创建驱动实例
    fn create_driver(&self, config: &GatewayConfig) -> Result<DriverBox>;
}

/// Storage manager (factory registry) / 存储管理器
///
/// Holds factories only. Drivers are built per request from the freshly loaded
/// configuration and dropped with the response.
#[derive(Clone, Default)]
pub struct StorageManager {
    factories: Arc<RwLock<HashMap<String, Arc<dyn DriverFactory>>>>,
}

impl StorageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register driver factory (replaces an existing one of the same type) / 注册驱动工厂
    pub async fn register_factory(&self, factory: Box<dyn DriverFactory>) -> Result<()> {
        let driver_type = factory.driver_type().to_string();

        let mut factories = self.factories.write().await;
        factories.insert(driver_type.clone(), Arc::from(factory));

        tracing::info!("Driver factory registered: {}", driver_type);
        Ok(())
    }

    /// Create driver instance for one request / 为单次请求创建驱动实例
    pub async fn create_driver(&self, driver_type: &str, config: &GatewayConfig) -> Result<DriverBox> {
        let factory = {
            let factories = self.factories.read().await;
            factories.get(driver_type)
                .cloned()
                .ok_or_else(|| anyhow!("Driver type not found: {}", driver_type))?
        };

        let driver = factory.create_driver(config)?;
        tracing::debug!("Driver created: {} ({})", driver.name(), driver_type);
        Ok(driver)
    }

    /// List all available driver types / 列出所有可用的驱动类型
    pub async fn list_driver_types(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        let mut types: Vec<String> = factories.keys().cloned().collect();
        types.sort();
        types
    }
}
