//! 又拍云驱动工厂

use anyhow::{anyhow, Result};

use crate::config::GatewayConfig;
use crate::storage::{DriverFactory, DriverBox};
use super::driver::UpyunDriver;

/// 又拍云驱动工厂
pub struct UpyunDriverFactory;

impl DriverFactory for UpyunDriverFactory {
    fn driver_type(&self) -> &'static str {
        "ups"
    }

    fn create_driver(&self, config: &GatewayConfig) -> Result<DriverBox> {
        let ups = config.ups.clone()
            .ok_or_else(|| anyhow!("missing Ups configuration block"))?;
        Ok(Box::new(UpyunDriver::new(ups, config.timeout())?))
    }
}
