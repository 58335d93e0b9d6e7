//! OSS驱动工厂

use anyhow::{anyhow, Result};

use crate::config::GatewayConfig;
use crate::storage::{DriverFactory, DriverBox};
use super::driver::OssDriver;

/// OSS驱动工厂
pub struct OssDriverFactory;

impl DriverFactory for OssDriverFactory {
    fn driver_type(&self) -> &'static str {
        "oss"
    }

    fn create_driver(&self, config: &GatewayConfig) -> Result<DriverBox> {
        let oss = config.oss.clone()
            .ok_or_else(|| anyhow!("missing Oss configuration block"))?;
        Ok(Box::new(OssDriver::new(oss, config.timeout())?))
    }
}
