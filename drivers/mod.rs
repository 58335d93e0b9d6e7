// Driver package / 驱动包
pub mod cos;
pub mod oss;
pub mod upyun;

use crate::storage::StorageManager;

/// Register all drivers to StorageManager / 注册所有驱动
pub async fn register_all(manager: &StorageManager) -> anyhow::Result<()> {
    // Register Tencent Cloud COS driver / 注册腾讯云COS驱动
    manager.register_factory(Box::new(cos::CosDriverFactory)).await?;
    // Register Alibaba Cloud OSS driver / 注册阿里云OSS驱动
    manager.register_factory(Box::new(oss::OssDriverFactory)).await?;
    // Register UPYUN driver / 注册又拍云驱动
    manager.register_factory(Box::new(upyun::UpyunDriverFactory)).await?;
    Ok(())
}
