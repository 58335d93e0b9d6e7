//! COS驱动核心实现
//!
//! 腾讯云COS兼容S3协议，通过rust-s3访问：
//! - Region使用自定义端点 https://cos.{region}.myqcloud.com
//! - 虚拟主机风格，实际访问 https://{bucket}.cos.{region}.myqcloud.com
//! - crate未开启fail-on-err，需要自行检查状态码

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;

use crate::config::CosConfig;
use crate::storage::{StorageDriver, Entry};
use crate::utils::resolve_domain;

/// COS驱动
pub struct CosDriver {
    config: CosConfig,
    bucket: Box<Bucket>,
    timeout: Duration,
}

impl CosDriver {
    /// 创建新的COS驱动实例
    pub fn new(config: CosConfig, timeout: Duration) -> Result<Self> {
        let bucket = Self::create_bucket(&config, timeout)?;
        Ok(Self { config, bucket, timeout })
    }

    /// 创建COS Bucket客户端，请求超时使用配置的 Timeout
    fn create_bucket(config: &CosConfig, timeout: Duration) -> Result<Box<Bucket>> {
        if config.bucket.is_empty() || config.region.is_empty() {
            return Err(anyhow!("Bucket and Region are required"));
        }

        let credentials = Credentials::new(
            Some(&config.secret_id),
            Some(&config.secret_key),
            None,
            None,
            None,
        ).map_err(|e| anyhow!("create credentials: {}", e))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: format!("https://cos.{}.myqcloud.com", config.region),
        };

        Bucket::new(&config.bucket, region, credentials)
            .and_then(|bucket| bucket.with_request_timeout(timeout))
            .map_err(|e| anyhow!("create bucket client: {}", e))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 带超时执行请求
    async fn timed<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, s3::error::S3Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| anyhow!("{}", e)),
            Err(_) => Err(anyhow!("request timed out after {}s", self.timeout.as_secs())),
        }
    }

    /// 写入对象并检查状态码
    async fn put_bytes(&self, key: &str, data: &[u8]) -> Result<()> {
        let response = self.timed(self.bucket.put_object(key, data)).await?;
        let code = response.status_code();
        if !(200..300).contains(&code) {
            return Err(anyhow!("PutObject {} returned {}: {}", key, code, String::from_utf8_lossy(response.bytes())));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageDriver for CosDriver {
    fn name(&self) -> &str {
        "COS"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Entry>> {
        tracing::debug!("COS list: bucket={}, prefix={}", self.config.bucket, prefix);

        // list内部按continuation token自动翻页
        let results = self.timed(
            self.bucket.list(prefix.to_string(), Some("/".to_string()))
        ).await?;

        let mut entries = Vec::new();

        for result in results {
            // 目录（公共前缀）
            for cp in result.common_prefixes.unwrap_or_default() {
                entries.push(Entry::dir(cp.prefix));
            }

            // 文件，跳过目录自身的占位对象
            for obj in result.contents {
                if obj.key == prefix {
                    continue;
                }
                entries.push(Entry::file(obj.key, obj.size as u64, obj.last_modified));
            }
        }

        Ok(entries)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!("COS delete: {}", path);
        let response = self.timed(self.bucket.delete_object(path)).await?;
        let code = response.status_code();
        if !(200..300).contains(&code) {
            return Err(anyhow!("DeleteObject {} returned {}: {}", path, code, String::from_utf8_lossy(response.bytes())));
        }
        Ok(())
    }

    async fn put(&self, key: &str, data: bytes::Bytes) -> Result<()> {
        tracing::debug!("COS put: key={}, size={}", key, data.len());
        self.put_bytes(key, &data).await
    }

    async fn create_dir(&self, key: &str) -> Result<()> {
        tracing::debug!("COS mkdir: {}", key);
        self.put_bytes(key, &[]).await
    }

    fn domain(&self) -> String {
        resolve_domain(&self.config.domain, &self.config.api_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(domain: &str) -> CosConfig {
        CosConfig {
            secret_id: "id".to_string(),
            secret_key: "key".to_string(),
            bucket: "test-1234567889".to_string(),
            region: "ap-nanjing".to_string(),
            domain: domain.to_string(),
        }
    }

    #[test]
    fn test_domain_falls_back_to_api_address() {
        let driver = CosDriver::new(config(""), Duration::from_secs(1)).unwrap();
        assert_eq!(driver.domain(), "https://test-1234567889.cos.ap-nanjing.myqcloud.com/");
    }

    #[test]
    fn test_custom_domain() {
        let driver = CosDriver::new(config("https://img.example.com/"), Duration::from_secs(1)).unwrap();
        assert_eq!(driver.domain(), "https://img.example.com/");
    }

    #[test]
    fn test_configured_timeout() {
        let driver = CosDriver::new(config(""), Duration::from_secs(150)).unwrap();
        assert_eq!(driver.timeout(), Duration::from_secs(150));

        let mut gateway = crate::config::GatewayConfig {
            cos: Some(config("")),
            timeout: Some(240),
            ..Default::default()
        };
        let driver = CosDriver::new(gateway.cos.take().unwrap(), gateway.timeout()).unwrap();
        assert_eq!(driver.timeout(), Duration::from_secs(240));
    }

    #[test]
    fn test_missing_bucket_is_error() {
        let mut cfg = config("");
        cfg.bucket.clear();
        assert!(CosDriver::new(cfg, Duration::from_secs(1)).is_err());
    }
}
