//! 又拍云存储驱动模块
//!
//! 文件结构：
//! - types.rs: API 数据类型定义
//! - client.rs: HTTP 客户端、请求签名
//! - driver.rs: StorageDriver 实现
//! - factory.rs: 驱动工厂

pub mod types;
pub mod client;
pub mod driver;
pub mod factory;

pub use factory::UpyunDriverFactory;
