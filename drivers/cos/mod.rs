//! 腾讯云COS驱动模块
//!
//! 文件结构：
//! - driver.rs: StorageDriver 实现（rust-s3）
//! - factory.rs: 驱动工厂

pub mod driver;
pub mod factory;

pub use factory::CosDriverFactory;
