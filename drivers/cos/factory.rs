//! COS驱动工厂

use anyhow::{anyhow, Result};

use crate::config::GatewayConfig;
use crate::storage::{DriverFactory, DriverBox};
use super::driver::CosDriver;

/// COS驱动工厂
pub struct CosDriverFactory;

impl DriverFactory for CosDriverFactory {
    fn driver_type(&self) -> &'static str {
        "cos"
    }

    fn create_driver(&self, config: &GatewayConfig) -> Result<DriverBox> {
        let cos = config.cos.clone()
            .ok_or_else(|| anyhow!("missing Cos configuration block"))?;
        Ok(Box::new(CosDriver::new(cos, config.timeout())?))
    }
}
